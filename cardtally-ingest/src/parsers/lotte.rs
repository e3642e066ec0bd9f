//! Lotte Card statement layout
//!
//! The header row floats below a variable-length preamble, so it is found by
//! keyword. Lotte supplies its own business-type column (`업종`), kept as the
//! record's category. Rows marked `취소여부 = Y` are cancelled purchases.
//!
//!   이용일자    이용가맹점      업종        이용금액   취소여부
//!   2024.01.05  스타벅스 역삼점  커피전문점   4,500     N

use cardtally_core::{parse_amount, Cell, Issuer, TransactionRecord, Workbook};
use tracing::debug;

use super::{cell_at, settle, sheet_at, StatementLayout, Table};
use crate::error::Result;

const HEADER_KEYWORDS: [&str; 4] = ["이용일자", "이용가맹점", "업종", "이용금액"];
const CANCEL_COLUMN: &str = "취소여부";

pub struct LotteLayout;

pub struct LotteRow {
    date: Cell,
    merchant: String,
    business_type: String,
    amount: Cell,
}

impl StatementLayout for LotteLayout {
    type Row = LotteRow;

    fn issuer(&self) -> Issuer {
        Issuer::Lotte
    }

    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>> {
        let sheet = sheet_at(workbook, 0, Issuer::Lotte)?;
        Table::find(sheet, &HEADER_KEYWORDS, Issuer::Lotte)
    }

    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<LotteRow>> {
        let cols = table.require(&HEADER_KEYWORDS)?;
        let cancel = table.column(CANCEL_COLUMN);

        let mut out = Vec::new();
        for row in table.data_rows() {
            if let Some(c) = cancel {
                if cell_at(row, c).text().eq_ignore_ascii_case("Y") {
                    debug!("lotte: skipping cancelled row");
                    continue;
                }
            }
            out.push(LotteRow {
                date: cell_at(row, cols[0]).clone(),
                merchant: cell_at(row, cols[1]).text(),
                business_type: cell_at(row, cols[2]).text(),
                amount: cell_at(row, cols[3]).clone(),
            });
        }
        Ok(out)
    }

    fn cleanse(&self, rows: Vec<LotteRow>) -> Result<Vec<TransactionRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            let (Some(date), Some(amount)) = (row.date.date(), parse_amount(&row.amount)) else {
                rejected += 1;
                continue;
            };
            records.push(
                TransactionRecord::new(date, Issuer::Lotte, row.merchant, amount)
                    .with_category(row.business_type),
            );
        }

        settle(Issuer::Lotte, records, rejected)
    }
}
