//! KB Kookmin Card statement layout
//!
//! Six rows of account preamble, then the header at row 6. Cancelled
//! approvals and cancellation slips are flagged in `상태`. Installment
//! purchases carry the full price; `결제방법` (e.g. `할부(3개월)`) tells how
//! many months it is spread over, and only one month's share is billed.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use cardtally_core::{parse_amount, Cell, Issuer, TransactionRecord, Workbook};

use super::{cell_at, settle, sheet_at, StatementLayout, Table};
use crate::error::Result;

const HEADER_ROW: usize = 6;
const COLUMNS: [&str; 5] = ["이용일", "이용하신곳", "이용카드명", "국내이용금액(원)", "결제방법"];
const STATUS_COLUMN: &str = "상태";
const CANCEL_MARKERS: [&str; 2] = ["승인취소", "취소전표"];
const LUMP_SUM: &str = "일시불";

pub struct KbLayout;

pub struct KbRow {
    date: Cell,
    merchant: String,
    card_name: String,
    amount: Cell,
    payment_method: String,
}

impl StatementLayout for KbLayout {
    type Row = KbRow;

    fn issuer(&self) -> Issuer {
        Issuer::Kb
    }

    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>> {
        let sheet = sheet_at(workbook, 0, Issuer::Kb)?;
        Table::at_row(sheet, HEADER_ROW, Issuer::Kb)
    }

    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<KbRow>> {
        let cols = table.require(&COLUMNS)?;
        let status = table.column(STATUS_COLUMN);

        let mut out = Vec::new();
        for row in table.data_rows() {
            if let Some(s) = status {
                let text = cell_at(row, s).text();
                if CANCEL_MARKERS.iter().any(|m| text.contains(m)) {
                    debug!(status = %text, "kb: skipping cancelled row");
                    continue;
                }
            }
            out.push(KbRow {
                date: cell_at(row, cols[0]).clone(),
                merchant: cell_at(row, cols[1]).text(),
                card_name: cell_at(row, cols[2]).text(),
                amount: cell_at(row, cols[3]).clone(),
                payment_method: cell_at(row, cols[4]).text(),
            });
        }
        Ok(out)
    }

    fn cleanse(&self, rows: Vec<KbRow>) -> Result<Vec<TransactionRecord>> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for row in rows {
            let (Some(date), Some(amount)) = (row.date.date(), parse_amount(&row.amount)) else {
                rejected += 1;
                continue;
            };
            let amount = match installment_months(&row.payment_method) {
                Some(months) => monthly_share(amount, months),
                None => amount,
            };
            let issuer = Issuer::from_card_name(&row.card_name).unwrap_or(Issuer::Kb);
            records.push(TransactionRecord::new(date, issuer, row.merchant, amount));
        }

        settle(Issuer::Kb, records, rejected)
    }
}

/// Months an installment purchase is spread over, or `None` for lump sums.
///
/// All digits in the payment-method text are read as one number, so
/// `할부(03개월)` is 3 months.
pub fn installment_months(payment_method: &str) -> Option<u32> {
    let method = payment_method.trim();
    if method == LUMP_SUM {
        return None;
    }
    let digits: String = method.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(months) => Some(months),
    }
}

/// One month's share, rounded half-to-even to whole won.
pub fn monthly_share(amount: Decimal, months: u32) -> Decimal {
    (amount / Decimal::from(months)).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}
