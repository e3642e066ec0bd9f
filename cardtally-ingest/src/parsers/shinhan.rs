//! Shinhan Card statement layout
//!
//! Header at row 2. The billed amount lives in `결제 금액`; older exports
//! only have `거래금액`.

use cardtally_core::{parse_amount, Cell, Issuer, TransactionRecord, Workbook};

use super::{cell_at, settle, sheet_at, StatementLayout, Table};
use crate::error::{NormalizeError, Result};

const HEADER_ROW: usize = 2;
const AMOUNT_COLUMNS: [&str; 2] = ["결제금액", "거래금액"];

pub struct ShinhanLayout;

pub struct ShinhanRow {
    date: Cell,
    merchant: String,
    amount: Cell,
}

impl StatementLayout for ShinhanLayout {
    type Row = ShinhanRow;

    fn issuer(&self) -> Issuer {
        Issuer::Shinhan
    }

    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>> {
        let sheet = sheet_at(workbook, 0, Issuer::Shinhan)?;
        Table::at_row(sheet, HEADER_ROW, Issuer::Shinhan)
    }

    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<ShinhanRow>> {
        let cols = table.require(&["거래일자", "이용가맹점"])?;
        let amount_col = AMOUNT_COLUMNS
            .iter()
            .find_map(|name| table.column(name))
            .ok_or_else(|| NormalizeError::MissingColumns {
                issuer: Issuer::Shinhan,
                columns: vec![AMOUNT_COLUMNS[0].to_string()],
            })?;

        Ok(table
            .data_rows()
            .map(|row| ShinhanRow {
                date: cell_at(row, cols[0]).clone(),
                merchant: cell_at(row, cols[1]).text(),
                amount: cell_at(row, amount_col).clone(),
            })
            .collect())
    }

    fn cleanse(&self, rows: Vec<ShinhanRow>) -> Result<Vec<TransactionRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            let (Some(date), Some(amount)) = (row.date.date(), parse_amount(&row.amount)) else {
                rejected += 1;
                continue;
            };
            records.push(TransactionRecord::new(date, Issuer::Shinhan, row.merchant, amount));
        }

        settle(Issuer::Shinhan, records, rejected)
    }
}
