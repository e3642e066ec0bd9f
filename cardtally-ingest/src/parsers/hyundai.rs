//! Hyundai Card statement layout
//!
//! Header at row 2. Subtotal, total and carried-over lines are mixed in with
//! the purchases and are recognised by the merchant text. Dates often come
//! through as bare Excel serial numbers rather than date cells.

use tracing::debug;

use cardtally_core::{from_excel_serial, parse_amount, Cell, Issuer, TransactionRecord, Workbook};
use chrono::NaiveDate;

use super::{cell_at, settle, sheet_at, StatementLayout, Table};
use crate::error::Result;

const HEADER_ROW: usize = 2;
const COLUMNS: [&str; 3] = ["이용일", "이용가맹점", "이용금액"];

const SUMMARY_MARKERS: [&str; 4] = ["합계", "소계", "총", "이월"];

pub struct HyundaiLayout;

pub struct HyundaiRow {
    date: Cell,
    merchant: String,
    amount: Cell,
}

impl StatementLayout for HyundaiLayout {
    type Row = HyundaiRow;

    fn issuer(&self) -> Issuer {
        Issuer::Hyundai
    }

    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>> {
        let sheet = sheet_at(workbook, 0, Issuer::Hyundai)?;
        Table::at_row(sheet, HEADER_ROW, Issuer::Hyundai)
    }

    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<HyundaiRow>> {
        let cols = table.require(&COLUMNS)?;

        let mut out = Vec::new();
        for row in table.data_rows() {
            let merchant = cell_at(row, cols[1]).text();
            if SUMMARY_MARKERS.iter().any(|m| merchant.contains(m)) {
                debug!(%merchant, "hyundai: skipping summary line");
                continue;
            }
            out.push(HyundaiRow {
                date: cell_at(row, cols[0]).clone(),
                merchant,
                amount: cell_at(row, cols[2]).clone(),
            });
        }
        Ok(out)
    }

    fn cleanse(&self, rows: Vec<HyundaiRow>) -> Result<Vec<TransactionRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            let (Some(date), Some(amount)) = (serial_or_date(&row.date), parse_amount(&row.amount))
            else {
                rejected += 1;
                continue;
            };
            records.push(TransactionRecord::new(date, Issuer::Hyundai, row.merchant, amount));
        }

        settle(Issuer::Hyundai, records, rejected)
    }
}

/// Numbers (and numeric text) are Excel serials; anything else is date text.
fn serial_or_date(cell: &Cell) -> Option<NaiveDate> {
    if let Some(serial) = cell.number() {
        return from_excel_serial(serial);
    }
    let text = cell.text();
    if let Ok(serial) = text.parse::<f64>() {
        if let Some(date) = from_excel_serial(serial) {
            return Some(date);
        }
    }
    cell.date()
}
