//! Date utilities: statement date text, Excel serials, and the output format.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Output format for every normalized record date.
pub const DATE_FORMAT: &str = "%Y.%m.%d";

static FULL_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\s*[./\-년]\s*(\d{1,2})\s*[./\-월]\s*(\d{1,2})(?:\D|$)")
        .expect("static date pattern")
});
static SHORT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})[./\-](\d{1,2})[./\-](\d{1,2})(?:\D|$)").expect("static date pattern")
});
static COMPACT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})(?:\D|$)").expect("static date pattern")
});
static DOTTED_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}\.\d{2}\.\d{2}").expect("static date pattern"));

/// Format a date the way exports and tables show it (`2024.01.05`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse the date part of a statement cell's text.
///
/// Accepts `2024.01.05`, `2024-1-5`, `2024/01/05`, `2024년 1월 5일`, `20240105`
/// and `24.01.05`; anything after the date (usually a time) is ignored.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = FULL_DATE_RE.captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3], 0);
    }
    if let Some(caps) = COMPACT_DATE_RE.captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3], 0);
    }
    if let Some(caps) = SHORT_DATE_RE.captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3], 2000);
    }
    None
}

fn ymd(y: &str, m: &str, d: &str, century: i32) -> Option<NaiveDate> {
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    let day: u32 = d.parse().ok()?;
    NaiveDate::from_ymd_opt(century + year, month, day)
}

/// True when the text starts with a `YYYY.MM.DD` date.
pub fn is_dotted_date(text: &str) -> bool {
    DOTTED_PREFIX_RE.is_match(text.trim())
}

/// Convert an Excel serial day number (1900 date system) to a date.
///
/// Day 0 is 1899-12-30, which absorbs Excel's phantom 1900-02-29 for every
/// date after February 1900. Fractions (time of day) are truncated.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
