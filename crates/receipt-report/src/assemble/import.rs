//! Page import between documents
//!
//! Receipt documents are merged by deep-copying each of their pages into the
//! report. Attributes a page inherits from its page tree are materialised on
//! the copy, since the copy hangs off a different tree.

use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes that may be inherited from ancestor page-tree nodes
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page trees deeper than this are treated as malformed
const MAX_TREE_DEPTH: usize = 64;

// =============================================================================
// Page Import
// =============================================================================

/// Copy every page of `source` into `output` as children of `pages_root`.
///
/// Returns the new page ids in source page order. The caller is responsible
/// for linking them into the `Kids` array of `pages_root`.
pub fn import_pages(
    output: &mut Document,
    pages_root: ObjectId,
    source: &Document,
) -> Result<Vec<ObjectId>> {
    let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();

    // Shared across pages so common resources are copied once
    let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();

    // Stray references into the source page tree land on the output tree
    for (id, object) in &source.objects {
        if is_pages_node(object) {
            cache.insert(*id, pages_root);
        }
    }

    // Reserve ids up front so references between pages resolve
    let mut new_ids = Vec::with_capacity(source_pages.len());
    for page_id in &source_pages {
        let new_id = output.new_object_id();
        cache.insert(*page_id, new_id);
        new_ids.push(new_id);
    }

    for (page_id, new_id) in source_pages.iter().zip(&new_ids) {
        let page = import_page(output, source, *page_id, pages_root, &mut cache)?;
        output.objects.insert(*new_id, Object::Dictionary(page));
    }

    Ok(new_ids)
}

/// Build the output dictionary for one source page
fn import_page(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    pages_root: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let page_dict = source.get_dictionary(page_id)?;
    let mut new_page = Dictionary::new();

    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_page.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }

    for key in INHERITABLE_KEYS {
        if new_page.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_dict, key) {
            new_page.set(key.to_vec(), copy_object_deep(output, source, &value, cache)?);
        }
    }

    new_page.set("Parent", Object::Reference(pages_root));
    Ok(new_page)
}

/// Look an attribute up the page's ancestor chain
fn inherited_attribute(source: &Document, page_dict: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut node = page_dict;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
        node = source.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

fn is_pages_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(|t| t.as_name())
        .map(|name| name == b"Pages")
        .unwrap_or(false)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times. The output
/// id is reserved before the referenced object is copied, so cyclic
/// references terminate.
fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                // Dangling references read as null
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let mut copied = stream.clone();
            copied.dict = copy_dictionary(output, source, &stream.dict, cache)?;
            copied.start_position = None;
            Ok(Object::Stream(copied))
        }
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}
