//! CSV-backed expense ledger

use crate::aggregate::{aggregate, grand_total};
use crate::types::*;
use receipt_report::{Amount, ReceiptFile};
use std::path::{Path, PathBuf};

const HEADER: [&str; 6] = ["payer", "approver", "category", "amount", "currency", "receipts"];

/// Append-only store of expense records
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record; a missing ledger file is an empty ledger
    pub async fn load(&self) -> Result<Vec<ExpenseRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // CSV parsing is CPU-bound, spawn blocking
        tokio::task::spawn_blocking(move || parse_records(&contents)).await?
    }

    /// Validate and append one record.
    ///
    /// Rejected when the ledger totals would no longer be representable.
    pub async fn append(&self, record: &ExpenseRecord) -> Result<()> {
        record.validate()?;

        let mut records = self.load().await?;
        records.push(record.clone());
        aggregate(&records)?;
        grand_total(&records)?;
        self.write_all(records).await
    }

    /// Delete every record, leaving an empty ledger
    pub async fn reset(&self) -> Result<()> {
        self.write_all(Vec::new()).await?;
        log::info!("Ledger {} reset", self.path.display());
        Ok(())
    }

    async fn write_all(&self, records: Vec<ExpenseRecord>) -> Result<()> {
        let bytes = tokio::task::spawn_blocking(move || serialize_records(&records)).await??;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write then rename so a crash never leaves a half-written ledger
        let tmp = self.path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn parse_records(contents: &str) -> Result<Vec<ExpenseRecord>> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record = result?;
        if record.len() < HEADER.len() {
            return Err(LedgerError::Parse {
                row,
                message: format!("expected {} columns, found {}", HEADER.len(), record.len()),
            });
        }

        let parse_err = |message: String| LedgerError::Parse { row, message };

        let category = record[2]
            .parse::<ExpenseCategory>()
            .map_err(|e| parse_err(e.to_string()))?;
        let amount = record[3]
            .parse::<Amount>()
            .map_err(|e| parse_err(e.to_string()))?;
        let receipts = record[5]
            .split(RECEIPT_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ReceiptFile::classify)
            .collect();

        records.push(ExpenseRecord {
            payer: record[0].to_string(),
            approver: record[1].to_string(),
            category,
            amount,
            currency: record[4].to_string(),
            receipts,
        });
    }

    Ok(records)
}

fn serialize_records(records: &[ExpenseRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for record in records {
        let receipts: Vec<String> = record
            .receipts
            .iter()
            .map(|r| r.path.to_string_lossy().into_owned())
            .collect();
        let category = record.category.code().to_string();
        let amount = record.amount.to_string();
        let receipts = receipts.join(RECEIPT_SEPARATOR);

        writer.write_record([
            record.payer.as_str(),
            record.approver.as_str(),
            category.as_str(),
            amount.as_str(),
            record.currency.as_str(),
            receipts.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| LedgerError::Io(e.into_error()))
}
