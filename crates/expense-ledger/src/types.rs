use receipt_report::{Amount, ReceiptFile};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed ledger row {row}: {message}")]
    Parse { row: usize, message: String },
    #[error("Invalid expense: {0}")]
    Validation(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// The only currency expenses are booked in
pub const CURRENCY: &str = "RSD";

/// Separator between receipt paths inside the ledger's `receipts` column
pub const RECEIPT_SEPARATOR: &str = "|";

/// Expense categories with their stable account codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExpenseCategory {
    Transport,
    Fuel,
    Tolls,
    Representation,
    Other,
}

impl ExpenseCategory {
    /// All categories in their reporting order
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Transport,
        ExpenseCategory::Fuel,
        ExpenseCategory::Tolls,
        ExpenseCategory::Representation,
        ExpenseCategory::Other,
    ];

    pub fn code(self) -> u32 {
        match self {
            ExpenseCategory::Transport => 529111,
            ExpenseCategory::Fuel => 51300,
            ExpenseCategory::Tolls => 53940,
            ExpenseCategory::Representation => 55100,
            ExpenseCategory::Other => 55900,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExpenseCategory::Transport => "Transport, taxi",
            ExpenseCategory::Fuel => "Fuel",
            ExpenseCategory::Tolls => "Tolls",
            ExpenseCategory::Representation => "Representation, courier delivery",
            ExpenseCategory::Other => "Other expenses, e.g. parking, hotel",
        }
    }

    /// Label shown on the report, e.g. `Fuel (51300)`
    pub fn label(self) -> String {
        format!("{} ({})", self.name(), self.code())
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = LedgerError;

    /// Parses an account code (`51300`) or a keyword (`fuel`)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u32>() {
            return Self::from_code(code)
                .ok_or_else(|| LedgerError::Validation(format!("Unknown category code {}", code)));
        }

        match s.to_ascii_lowercase().as_str() {
            "transport" | "taxi" => Ok(ExpenseCategory::Transport),
            "fuel" => Ok(ExpenseCategory::Fuel),
            "tolls" => Ok(ExpenseCategory::Tolls),
            "representation" | "courier" => Ok(ExpenseCategory::Representation),
            "other" => Ok(ExpenseCategory::Other),
            _ => Err(LedgerError::Validation(format!("Unknown category {:?}", s))),
        }
    }
}

/// One submitted expense
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub payer: String,
    pub approver: String,
    pub category: ExpenseCategory,
    pub amount: Amount,
    pub currency: String,
    pub receipts: Vec<ReceiptFile>,
}

impl ExpenseRecord {
    pub fn new(
        payer: impl Into<String>,
        approver: impl Into<String>,
        category: ExpenseCategory,
        amount: Amount,
        receipts: Vec<ReceiptFile>,
    ) -> Self {
        Self {
            payer: payer.into(),
            approver: approver.into(),
            category,
            amount,
            currency: CURRENCY.to_string(),
            receipts,
        }
    }

    /// Intake rules: an approver and at least one receipt are mandatory
    pub fn validate(&self) -> Result<()> {
        if self.approver.trim().is_empty() {
            return Err(LedgerError::Validation(
                "The approving person is required".to_string(),
            ));
        }

        if self.receipts.is_empty() {
            return Err(LedgerError::Validation(
                "At least one receipt is required".to_string(),
            ));
        }

        if let Some(receipt) = self
            .receipts
            .iter()
            .find(|r| r.path.to_string_lossy().contains(RECEIPT_SEPARATOR))
        {
            return Err(LedgerError::Validation(format!(
                "Receipt path {} contains the reserved character {:?}",
                receipt.path.display(),
                RECEIPT_SEPARATOR
            )));
        }

        Ok(())
    }
}
