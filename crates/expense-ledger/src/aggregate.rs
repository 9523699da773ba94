use crate::types::{ExpenseCategory, ExpenseRecord, LedgerError, Result};
use receipt_report::{Amount, CategorySummary};
use std::collections::BTreeMap;

/// Group records into one summary per category present.
///
/// Summaries come out in category declaration order; receipts keep the
/// order of the records they came from.
pub fn aggregate(records: &[ExpenseRecord]) -> Result<Vec<CategorySummary>> {
    let mut groups: BTreeMap<ExpenseCategory, CategorySummary> = BTreeMap::new();

    for record in records {
        let summary = groups.entry(record.category).or_insert_with(|| {
            CategorySummary::new(record.category.label(), Amount::ZERO, Vec::new())
        });
        summary.total = summary.total.checked_add(record.amount).ok_or_else(|| {
            LedgerError::Validation(format!("Total of {} overflows", record.category))
        })?;
        summary.receipts.extend(record.receipts.iter().cloned());
    }

    Ok(groups.into_values().collect())
}

/// Sum of every record amount
pub fn grand_total(records: &[ExpenseRecord]) -> Result<Amount> {
    Amount::checked_sum(records.iter().map(|r| r.amount))
        .ok_or_else(|| LedgerError::Validation("Grand total of all expenses overflows".to_string()))
}
