//! CSV export of the aggregated records and the summary.

use serde::Serialize;
use std::io::Write;

use cardtally_core::TransactionRecord;

use crate::summary::Summary;

#[derive(Serialize)]
struct RecordRow<'a> {
    date: String,
    issuer: &'a str,
    category: &'a str,
    merchant: &'a str,
    amount: String,
}

/// One line per record: `date,issuer,category,merchant,amount`.
pub fn write_records_csv<W: Write>(writer: W, records: &[TransactionRecord]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.write_record(["date", "issuer", "category", "merchant", "amount"])?;
    }
    for record in records {
        wtr.serialize(RecordRow {
            date: record.date_label(),
            issuer: record.issuer.label(),
            category: &record.category,
            merchant: &record.merchant,
            amount: record.amount.normalize().to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Category block, issuer block, then the grand total.
pub fn write_summary_csv<W: Write>(writer: W, summary: &Summary) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["category", "amount"])?;
    for c in &summary.by_category {
        let amount = c.amount.normalize().to_string();
        wtr.write_record([c.category.as_str(), amount.as_str()])?;
    }

    wtr.write_record(["issuer", "amount"])?;
    for i in &summary.by_issuer {
        let amount = i.amount.normalize().to_string();
        wtr.write_record([i.issuer.label(), amount.as_str()])?;
    }

    let total = summary.total.normalize().to_string();
    wtr.write_record(["total", total.as_str()])?;
    wtr.flush()?;
    Ok(())
}
