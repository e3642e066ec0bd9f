//! Currency cleansing for statement amount columns.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::workbook::Cell;

/// Parse an amount cell. Numeric cells convert directly; text goes through
/// [`parse_amount_text`]. Blank and non-numeric cells yield `None`.
pub fn parse_amount(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Int(i) => Some(Decimal::from(*i)),
        Cell::Float(f) => Decimal::try_from(*f).ok().map(|d| d.normalize()),
        Cell::Text(s) => parse_amount_text(s),
        _ => None,
    }
}

/// Parse amount text such as `12,300`, `-5,000원`, `₩ 7,000` or `(1,200)`.
pub fn parse_amount_text(text: &str) -> Option<Decimal> {
    let mut s: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '원' | '₩' | '\\'))
        .collect();
    if s.is_empty() {
        return None;
    }

    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') && s.len() > 2 {
        negative = true;
        s = s[1..s.len() - 1].to_string();
    }
    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.to_string();
    }
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value = Decimal::from_str(&s).ok()?;
    Some(if negative { -value } else { value })
}
