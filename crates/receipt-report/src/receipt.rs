//! Inputs of one report compilation

use crate::types::Amount;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// How a receipt file is turned into report pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptKind {
    /// Photo or scan, rendered onto its own page
    Raster,
    /// Already paginated document, appended as-is
    Document,
    /// Anything else; never produces a page
    Unsupported,
}

impl ReceiptKind {
    /// Classify by file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("jpg" | "jpeg" | "png") => ReceiptKind::Raster,
            Some("pdf") => ReceiptKind::Document,
            _ => ReceiptKind::Unsupported,
        }
    }
}

/// A stored receipt file tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptFile {
    pub path: PathBuf,
    pub kind: ReceiptKind,
}

impl ReceiptFile {
    pub fn new(path: impl Into<PathBuf>, kind: ReceiptKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Tag a path with the kind derived from its extension
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = ReceiptKind::from_path(&path);
        Self { path, kind }
    }
}

/// Aggregated total and receipts of one expense category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub label: String,
    pub total: Amount,
    pub receipts: Vec<ReceiptFile>,
}

impl CategorySummary {
    pub fn new(label: impl Into<String>, total: Amount, receipts: Vec<ReceiptFile>) -> Self {
        Self {
            label: label.into(),
            total,
            receipts,
        }
    }
}

/// Everything one compilation needs, passed explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub requester: String,
    pub approver: String,
    pub date: NaiveDate,
    pub categories: Vec<CategorySummary>,
}

impl ReportRequest {
    /// Sum of all category totals, `None` if it overflows
    pub fn grand_total(&self) -> Option<Amount> {
        Amount::checked_sum(self.categories.iter().map(|c| c.total))
    }

    /// Receipts in traversal order: category order, then file order
    pub fn receipts(&self) -> impl Iterator<Item = &ReceiptFile> {
        self.categories.iter().flat_map(|c| c.receipts.iter())
    }
}
