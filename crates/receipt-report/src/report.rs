use crate::receipt::ReceiptFile;
use crate::types::Result;
use lopdf::Document;
use std::fmt;

/// Why a receipt contributed no pages
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Raster file that could not be opened or decoded
    Undecodable,
    /// Same decoded pixels as an earlier receipt
    Duplicate,
    /// Decoded, but could not be encoded or placed on a page
    RenderFailed(String),
    /// PDF that could not be loaded or has no pages
    UnreadableDocument(String),
    /// Extension outside the supported image and document kinds
    UnsupportedKind,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Undecodable => write!(f, "image could not be decoded"),
            SkipReason::Duplicate => write!(f, "duplicate of an earlier receipt"),
            SkipReason::RenderFailed(e) => write!(f, "page rendering failed: {}", e),
            SkipReason::UnreadableDocument(e) => write!(f, "document could not be read: {}", e),
            SkipReason::UnsupportedKind => write!(f, "unsupported file type"),
        }
    }
}

/// A receipt left out of the report, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedReceipt {
    pub receipt: ReceiptFile,
    pub reason: SkipReason,
}

/// Page and skip counts of a compiled report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportStatistics {
    /// Receipts visited during traversal, duplicates included
    pub receipts_seen: usize,
    /// Pages rendered from raster receipts
    pub raster_pages: usize,
    /// Pages appended from native documents
    pub document_pages: usize,
    /// Raster receipts dropped as duplicates
    pub duplicates: usize,
    /// Receipts dropped for any other reason
    pub unreadable: usize,
}

/// The merged report: summary page followed by receipt pages
#[derive(Debug, Clone)]
pub struct CompiledReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub skipped: Vec<SkippedReceipt>,
    pub statistics: ReportStatistics,
}

impl CompiledReport {
    /// Number of pages after the summary
    pub fn receipt_pages(&self) -> usize {
        self.page_count.saturating_sub(1)
    }

    /// Parse the report bytes back into a document
    pub fn to_document(&self) -> Result<Document> {
        Ok(Document::load_mem(&self.bytes)?)
    }
}
