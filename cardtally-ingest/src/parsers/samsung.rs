//! Samsung Card statement layout
//!
//! Transactions are on the second sheet with the header on its first row.
//! Samsung lists a cancelled approval as a second row with the negated
//! amount at the same date and time, so approval/cancellation pairs are
//! removed together.
//!
//!   승인일자     승인시각   가맹점명     승인금액(원)
//!   2024.06.01   12:30:11   스타벅스     5,000
//!   2024.06.01   12:30:11   스타벅스     -5,000

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use cardtally_core::{parse_amount, Cell, Issuer, TransactionRecord, Workbook};

use super::{cell_at, settle, sheet_at, StatementLayout, Table};
use crate::error::Result;

const SHEET_INDEX: usize = 1;
const HEADER_ROW: usize = 0;
const COLUMNS: [&str; 4] = ["승인일자", "승인시각", "가맹점명", "승인금액(원)"];

pub struct SamsungLayout;

pub struct SamsungRow {
    date: Cell,
    time: String,
    merchant: String,
    amount: Cell,
}

impl StatementLayout for SamsungLayout {
    type Row = SamsungRow;

    fn issuer(&self) -> Issuer {
        Issuer::Samsung
    }

    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>> {
        let sheet = sheet_at(workbook, SHEET_INDEX, Issuer::Samsung)?;
        Table::at_row(sheet, HEADER_ROW, Issuer::Samsung)
    }

    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<SamsungRow>> {
        let cols = table.require(&COLUMNS)?;

        Ok(table
            .data_rows()
            .filter(|row| cols.iter().all(|&c| !cell_at(row, c).is_empty()))
            .map(|row| SamsungRow {
                date: cell_at(row, cols[0]).clone(),
                time: cell_at(row, cols[1]).text(),
                merchant: cell_at(row, cols[2]).text(),
                amount: cell_at(row, cols[3]).clone(),
            })
            .collect())
    }

    fn cleanse(&self, rows: Vec<SamsungRow>) -> Result<Vec<TransactionRecord>> {
        let mut parsed = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            let (Some(date), Some(amount)) = (row.date.date(), parse_amount(&row.amount)) else {
                rejected += 1;
                continue;
            };
            let key = reversal_key(&row.date.text(), &row.time, amount);
            parsed.push((key, TransactionRecord::new(date, Issuer::Samsung, row.merchant, amount)));
        }

        let records = drop_reversal_pairs(parsed);
        settle(Issuer::Samsung, records, rejected)
    }
}

/// Rows sharing this key are the same approval seen from both sides.
fn reversal_key(date: &str, time: &str, amount: Decimal) -> String {
    format!("{date}_{time}_{}", amount.abs().normalize())
}

/// Remove every row of a key group that holds both a charge and its reversal.
///
/// Input order is kept for the surviving rows.
fn drop_reversal_pairs(rows: Vec<(String, TransactionRecord)>) -> Vec<TransactionRecord> {
    #[derive(Default)]
    struct Group {
        count: usize,
        positive: bool,
        negative: bool,
    }

    let mut groups: HashMap<&str, Group> = HashMap::new();
    for (key, record) in &rows {
        let group = groups.entry(key.as_str()).or_default();
        group.count += 1;
        if record.amount > Decimal::ZERO {
            group.positive = true;
        } else if record.amount < Decimal::ZERO {
            group.negative = true;
        }
    }

    let reversed: Vec<String> = groups
        .into_iter()
        .filter(|(_, g)| g.count > 1 && g.positive && g.negative)
        .map(|(k, _)| k.to_string())
        .collect();
    if !reversed.is_empty() {
        debug!(pairs = reversed.len(), "samsung: removing cancelled approvals");
    }

    rows.into_iter()
        .filter(|(key, _)| !reversed.contains(key))
        .map(|(_, record)| record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use crate::parsers::fixtures::*;
    use cardtally_core::Sheet;

    fn statement(data: Vec<Vec<Cell>>) -> Workbook {
        let mut rows = vec![row(&["승인일자", "승인시각", "카드번호", "가맹점명", "승인금액(원)"])];
        rows.extend(data);
        Workbook::new(vec![
            Sheet::new("요약", vec![row(&["삼성카드 이용내역"])]),
            Sheet::new("승인내역", rows),
        ])
    }

    #[test]
    fn test_parse_samsung() {
        let wb = statement(vec![
            row(&["2024.06.01", "12:30:11", "1234", "스타벅스", "5,000"]),
            row(&["2024.06.02", "08:05:00", "1234", "교보문고", "21,000"]),
        ]);
        let records = SamsungLayout.normalize(&wb).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].merchant, "교보문고");
        assert_eq!(records[1].amount, Decimal::from(21_000));
        assert!(records.iter().all(|r| r.issuer == Issuer::Samsung && r.category.is_empty()));
    }

    #[test]
    fn test_reversal_pair_removed() {
        let wb = statement(vec![
            row(&["2024.06.01", "12:30:11", "1234", "스타벅스", "5,000"]),
            row(&["2024.06.01", "12:30:11", "1234", "스타벅스", "-5,000"]),
        ]);
        assert!(SamsungLayout.normalize(&wb).unwrap().is_empty());
    }

    #[test]
    fn test_reversal_needs_matching_time() {
        let wb = statement(vec![
            row(&["2024.06.01", "12:30:11", "1234", "스타벅스", "5,000"]),
            row(&["2024.06.01", "12:31:00", "1234", "스타벅스", "-5,000"]),
            row(&["2024.06.01", "13:00:00", "1234", "GS25", "1,500"]),
            row(&["2024.06.01", "13:00:00", "1234", "GS25", "1,500"]),
        ]);
        let records = SamsungLayout.normalize(&wb).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let wb = statement(vec![
            row(&["2024.06.01", "12:30:11", "1234", "스타벅스", "5,000"]),
            row(&["2024.06.01", "", "1234", "스타벅스", "3,000"]),
            row(&["", "", "", "합계", "8,000"]),
        ]);
        let records = SamsungLayout.normalize(&wb).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_single_sheet_workbook() {
        let wb = single_sheet(vec![row(&["승인일자", "승인시각", "가맹점명", "승인금액(원)"])]);
        assert!(matches!(
            SamsungLayout.normalize(&wb),
            Err(NormalizeError::MissingSheet { issuer: Issuer::Samsung, index: 1 })
        ));
    }

    #[test]
    fn test_reversal_key_ignores_sign_and_scale() {
        assert_eq!(
            reversal_key("2024.06.01", "12:30:11", Decimal::new(-50000, 1)),
            reversal_key("2024.06.01", "12:30:11", Decimal::from(5000))
        );
    }
}
