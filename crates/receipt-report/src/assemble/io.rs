//! Report I/O operations

use crate::constants::REPORT_FILE_PREFIX;
use crate::report::CompiledReport;
use crate::types::*;
use chrono::NaiveDate;
use lopdf::Document;
use std::path::Path;

/// Write the compiled report to disk
pub async fn save_report(report: &CompiledReport, path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), &report.bytes).await?;
    Ok(())
}

/// Delivery file name for a report requested on `date`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("{}_{}.pdf", REPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Serialize a document to bytes
pub(crate) fn document_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}
