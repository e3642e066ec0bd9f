//! Hana Card statement layout
//!
//! A long account summary fills the top of the sheet; the transaction header
//! is at row 28. Below the purchases Hana appends per-card subtotals, notices
//! and fee lines in the same columns, so only rows that open with a dotted
//! date are transactions.
//!
//!   거래일자      가맹점명        이용금액
//!   2024.05.03    배달의민족       18,900
//!   소계                         18,900

use tracing::debug;

use cardtally_core::{is_dotted_date, parse_amount, Cell, Issuer, TransactionRecord, Workbook};

use super::{cell_at, settle, sheet_at, StatementLayout, Table};
use crate::error::Result;

const HEADER_ROW: usize = 28;
const COLUMNS: [&str; 3] = ["거래일자", "가맹점명", "이용금액"];

pub struct HanaLayout;

pub struct HanaRow {
    date: Cell,
    merchant: String,
    amount: Cell,
}

impl StatementLayout for HanaLayout {
    type Row = HanaRow;

    fn issuer(&self) -> Issuer {
        Issuer::Hana
    }

    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>> {
        let sheet = sheet_at(workbook, 0, Issuer::Hana)?;
        Table::at_row(sheet, HEADER_ROW, Issuer::Hana)
    }

    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<HanaRow>> {
        let cols = table.require(&COLUMNS)?;

        let mut out = Vec::new();
        for row in table.data_rows() {
            let date = cell_at(row, cols[0]);
            if !opens_with_date(date) {
                debug!(first = %date.text(), "hana: skipping non-transaction line");
                continue;
            }
            out.push(HanaRow {
                date: date.clone(),
                merchant: cell_at(row, cols[1]).text(),
                amount: cell_at(row, cols[2]).clone(),
            });
        }
        Ok(out)
    }

    fn cleanse(&self, rows: Vec<HanaRow>) -> Result<Vec<TransactionRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            let (Some(date), Some(amount)) = (row.date.date(), parse_amount(&row.amount)) else {
                rejected += 1;
                continue;
            };
            records.push(TransactionRecord::new(date, Issuer::Hana, row.merchant, amount));
        }

        settle(Issuer::Hana, records, rejected)
    }
}

fn opens_with_date(cell: &Cell) -> bool {
    matches!(cell, Cell::DateTime(_)) || is_dotted_date(&cell.text())
}
