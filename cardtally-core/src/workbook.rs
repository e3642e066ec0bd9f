//! In-memory spreadsheet grid: the shape every statement reader produces.
//!
//! Rows and columns are absolute sheet coordinates, so row 0 is the first
//! sheet row even when it is blank. Issuer layouts that skip a fixed number
//! of rows rely on this.

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::date::{format_date, from_excel_serial, parse_date_text};

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date-time (days since 1899-12-30, fraction = time of day).
    DateTime(f64),
    Error(String),
}

impl Cell {
    pub fn text_of(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Blank cells and whitespace-only text count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text of the cell, trimmed.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            Cell::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Cell::DateTime(serial) => datetime_text(*serial),
            Cell::Error(e) => e.clone(),
        }
    }

    /// Header-style text: every whitespace character (spaces, `\n`, `\r`) removed.
    pub fn compact_text(&self) -> String {
        compact(&self.text())
    }

    /// Interpret the cell as a calendar date.
    ///
    /// Date cells convert from their serial; text goes through
    /// [`parse_date_text`]. Plain numbers are only accepted in the compact
    /// `YYYYMMDD` form; layouts that store serials as plain numbers convert
    /// them explicitly.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Cell::DateTime(serial) => from_excel_serial(*serial),
            Cell::Text(s) => parse_date_text(s),
            Cell::Int(_) | Cell::Float(_) => {
                let text = self.text();
                if text.len() == 8 {
                    parse_date_text(&text)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Numeric value of a numeric cell (Excel serials included).
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) | Cell::DateTime(f) => Some(*f),
            _ => None,
        }
    }
}

fn datetime_text(serial: f64) -> String {
    let Some(date) = from_excel_serial(serial) else {
        return serial.to_string();
    };
    let seconds = (serial.fract() * 86_400.0).round() as u32;
    if seconds == 0 {
        return format_date(date);
    }
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => {
            let at = midnight + chrono::Duration::seconds(i64::from(seconds));
            format!(
                "{} {:02}:{:02}:{:02}",
                format_date(at.date()),
                at.hour(),
                at.minute(),
                at.second()
            )
        }
        None => format_date(date),
    }
}

/// Remove every whitespace character from a label.
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// One worksheet as a 2-D grid with no assumed header row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// An ordered list of sheets, as read from a statement file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
