#![allow(dead_code)]

use image::{Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Build an in-memory PDF with `num_pages` blank Letter pages
pub fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // MediaBox and Resources live on the tree root and are inherited
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Resources", Object::Dictionary(Dictionary::new())),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a test PDF to `dir/name`
pub fn write_test_pdf(dir: &Path, name: &str, num_pages: usize) -> PathBuf {
    let path = dir.join(name);
    let mut doc = create_test_pdf(num_pages);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

/// A gradient image whose pixels depend on `seed`
pub fn test_image(width: u32, height: u32, seed: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x as u8).wrapping_add(seed),
            (y as u8).wrapping_mul(3),
            seed,
        ])
    })
}

/// Save a test image to `dir/name`; the format follows the extension
pub fn write_test_image(dir: &Path, name: &str, width: u32, height: u32, seed: u8) -> PathBuf {
    let path = dir.join(name);
    test_image(width, height, seed).save(&path).unwrap();
    path
}

/// Write bytes that no image decoder accepts
pub fn write_corrupt_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").unwrap();
    path
}

/// MediaBox width and height of the 1-based page `number`, inheritance included
pub fn page_size(doc: &Document, number: u32) -> (f32, f32) {
    let mut node = doc.get_dictionary(doc.get_pages()[&number]).unwrap();
    let media_box = loop {
        if let Ok(mb) = node.get(b"MediaBox") {
            break mb.as_array().unwrap().clone();
        }
        let parent = node.get(b"Parent").unwrap().as_reference().unwrap();
        node = doc.get_dictionary(parent).unwrap();
    };
    (as_number(&media_box[2]), as_number(&media_box[3]))
}

fn as_number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("not a number: {:?}", other),
    }
}
