//! Report assembly
//!
//! This module orchestrates one compilation:
//! 1. Render the summary page, which becomes page 1
//! 2. Walk receipts in category order, then file order
//! 3. Render raster receipts once per distinct fingerprint, pass documents through
//! 4. Import every produced page into the summary document and serialize it
//!
//! Per-receipt failures become skips; only whole-report faults are errors.

mod import;
mod io;

pub use import::import_pages;
pub use io::{default_file_name, save_report};

use crate::fingerprint::{ReceiptFingerprint, decode_rgb, fingerprint_image};
use crate::options::ReportOptions;
use crate::receipt::{ReceiptFile, ReceiptKind, ReportRequest};
use crate::render::{render_raster_image, render_summary_page};
use crate::report::*;
use crate::types::*;
use io::document_bytes;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashSet;

/// Compile a report on the blocking pool, honouring the configured deadline.
///
/// The deadline bounds how long the caller waits; a compilation that
/// overruns keeps its intermediates in memory only, so nothing is left
/// behind when its result is discarded.
pub async fn compile_report(
    request: &ReportRequest,
    options: &ReportOptions,
) -> Result<CompiledReport> {
    options.validate()?;

    let request = request.clone();
    let options = options.clone();
    let deadline = options.deadline();

    let task =
        tokio::task::spawn_blocking(move || ReportAssembler::new(options).compile(&request));

    match deadline {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| ReportError::DeadlineExceeded(limit))??,
        None => task.await?,
    }
}

/// Result of processing one receipt
enum ReceiptOutcome {
    Raster(Document),
    Document(Document),
    Skipped(SkipReason),
}

/// Synchronous report compilation pipeline
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    options: ReportOptions,
}

impl ReportAssembler {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Compile the summary page and all receipts into one document
    pub fn compile(&self, request: &ReportRequest) -> Result<CompiledReport> {
        self.options.validate()?;

        let mut report = render_summary_page(request, &self.options)?;
        let pages_root = pages_root_id(&report)?;
        let mut kids = page_tree_kids(&report, pages_root)?;

        let mut seen: HashSet<ReceiptFingerprint> = HashSet::new();
        let mut skipped = Vec::new();
        let mut stats = ReportStatistics::default();
        let mut needs_prune = false;

        for receipt in request.receipts() {
            stats.receipts_seen += 1;

            let outcome = match self.process_receipt(receipt, &mut seen) {
                ReceiptOutcome::Raster(page) => {
                    match import_pages(&mut report, pages_root, &page) {
                        Ok(ids) => {
                            stats.raster_pages += ids.len();
                            Ok(ids)
                        }
                        Err(e) => Err(SkipReason::RenderFailed(e.to_string())),
                    }
                }
                ReceiptOutcome::Document(doc) => {
                    match import_pages(&mut report, pages_root, &doc) {
                        Ok(ids) => {
                            stats.document_pages += ids.len();
                            Ok(ids)
                        }
                        Err(e) => Err(SkipReason::UnreadableDocument(e.to_string())),
                    }
                }
                ReceiptOutcome::Skipped(reason) => Err(reason),
            };

            match outcome {
                Ok(ids) => {
                    log::debug!(
                        "Appended {} page(s) from {}",
                        ids.len(),
                        receipt.path.display()
                    );
                    kids.extend(ids.into_iter().map(Object::Reference));
                }
                Err(reason) => {
                    if reason == SkipReason::Duplicate {
                        stats.duplicates += 1;
                        log::debug!("Skipping {}: {}", receipt.path.display(), reason);
                    } else {
                        // Import may have left orphaned objects behind
                        needs_prune |= matches!(
                            reason,
                            SkipReason::RenderFailed(_) | SkipReason::UnreadableDocument(_)
                        );
                        stats.unreadable += 1;
                        log::warn!("Skipping {}: {}", receipt.path.display(), reason);
                    }
                    skipped.push(SkippedReceipt {
                        receipt: receipt.clone(),
                        reason,
                    });
                }
            }
        }

        let page_count = set_page_tree_kids(&mut report, pages_root, kids)?;
        if needs_prune {
            report.prune_objects();
        }
        let bytes = document_bytes(&mut report)?;

        log::info!(
            "Compiled report: {} page(s), {} receipt(s) skipped",
            page_count,
            skipped.len()
        );

        Ok(CompiledReport {
            bytes,
            page_count,
            skipped,
            statistics: stats,
        })
    }

    fn process_receipt(
        &self,
        receipt: &ReceiptFile,
        seen: &mut HashSet<ReceiptFingerprint>,
    ) -> ReceiptOutcome {
        match receipt.kind {
            ReceiptKind::Raster => self.process_raster(receipt, seen),
            ReceiptKind::Document => load_document(receipt),
            ReceiptKind::Unsupported => ReceiptOutcome::Skipped(SkipReason::UnsupportedKind),
        }
    }

    fn process_raster(
        &self,
        receipt: &ReceiptFile,
        seen: &mut HashSet<ReceiptFingerprint>,
    ) -> ReceiptOutcome {
        let image = match decode_rgb(&receipt.path) {
            Ok(image) => image,
            Err(e) => {
                log::debug!("Cannot decode {}: {}", receipt.path.display(), e);
                return ReceiptOutcome::Skipped(SkipReason::Undecodable);
            }
        };

        let fingerprint = fingerprint_image(&image);
        if seen.contains(&fingerprint) {
            return ReceiptOutcome::Skipped(SkipReason::Duplicate);
        }

        // A failed render leaves the fingerprint unclaimed
        match render_raster_image(&image, &self.options) {
            Ok(page) => {
                seen.insert(fingerprint);
                ReceiptOutcome::Raster(page)
            }
            Err(e) => ReceiptOutcome::Skipped(SkipReason::RenderFailed(e.to_string())),
        }
    }
}

fn load_document(receipt: &ReceiptFile) -> ReceiptOutcome {
    let doc = match Document::load(&receipt.path) {
        Ok(doc) => doc,
        Err(e) => return ReceiptOutcome::Skipped(SkipReason::UnreadableDocument(e.to_string())),
    };

    if doc.is_encrypted() {
        return ReceiptOutcome::Skipped(SkipReason::UnreadableDocument(
            "document is encrypted".to_string(),
        ));
    }

    if doc.get_pages().is_empty() {
        return ReceiptOutcome::Skipped(SkipReason::UnreadableDocument(
            "document has no pages".to_string(),
        ));
    }

    ReceiptOutcome::Document(doc)
}

// =============================================================================
// Page Tree
// =============================================================================

fn pages_root_id(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let catalog = doc.get_dictionary(catalog_id)?;
    Ok(catalog.get(b"Pages")?.as_reference()?)
}

fn page_tree_kids(doc: &Document, pages_root: ObjectId) -> Result<Vec<Object>> {
    let pages_dict = doc.get_dictionary(pages_root)?;
    Ok(pages_dict.get(b"Kids")?.as_array()?.clone())
}

/// Replace the root's kids and return the new leaf page count
fn set_page_tree_kids(
    doc: &mut Document,
    pages_root: ObjectId,
    kids: Vec<Object>,
) -> Result<usize> {
    let mut pages_dict = doc.get_dictionary(pages_root)?.clone();
    let added = kids.len() as i64 - pages_dict.get(b"Kids")?.as_array()?.len() as i64;
    let count = pages_dict.get(b"Count")?.as_i64()? + added;

    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(count));
    doc.objects.insert(pages_root, Object::Dictionary(pages_dict));
    Ok(count.max(0) as usize)
}
