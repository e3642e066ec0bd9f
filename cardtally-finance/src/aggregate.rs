//! Merge normalized statements into one categorized, sorted record list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cardtally_core::TransactionRecord;

use crate::category_rules::RuleSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Re-run the rules over every record, replacing vendor-supplied categories.
    pub recategorize_all: bool,
}

/// Concatenate per-file record lists, fill in categories, and sort by
/// (issuer label, category, date). The sort is stable, so records equal on
/// all three keys keep their input order.
pub fn aggregate<I>(batches: I, rules: &RuleSet, options: AggregateOptions) -> Vec<TransactionRecord>
where
    I: IntoIterator<Item = Vec<TransactionRecord>>,
{
    let mut records: Vec<TransactionRecord> = batches.into_iter().flatten().collect();

    let mut categorized = 0;
    for record in &mut records {
        if options.recategorize_all || !record.is_categorized() {
            record.category = rules.categorize(&record.merchant).to_string();
            categorized += 1;
        }
    }
    debug!(total = records.len(), categorized, "records categorized");

    records.sort_by(|a, b| {
        a.issuer
            .label()
            .cmp(b.issuer.label())
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.date.cmp(&b.date))
    });
    records
}
