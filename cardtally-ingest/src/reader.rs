//! Spreadsheet reader: statement bytes or paths into the in-memory grid.
//!
//! Backed by calamine, which sniffs xlsx / xlsm / xlsb / xls / ods itself.

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

use cardtally_core::{Cell, Sheet, Workbook};

use crate::error::ReadError;

/// Read an uploaded statement held in memory.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, ReadError> {
    let sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    collect_sheets(sheets)
}

/// Read a statement file from disk.
pub fn read_workbook_path(path: impl AsRef<Path>) -> Result<Workbook, ReadError> {
    let sheets = open_workbook_auto(path.as_ref())?;
    collect_sheets(sheets)
}

fn collect_sheets<RS: Read + Seek>(mut sheets: Sheets<RS>) -> Result<Workbook, ReadError> {
    let names = sheets.sheet_names();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let range = sheets
            .worksheet_range(&name)
            .map_err(|source| ReadError::Sheet {
                name: name.clone(),
                source,
            })?;
        let rows = grid_rows(&range);
        debug!(sheet = %name, rows = rows.len(), "read sheet");
        out.push(Sheet::new(name, rows));
    }

    Ok(Workbook::new(out))
}

/// Expand a calamine range into absolute sheet coordinates.
fn grid_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(to_cell));
        rows.push(cells);
    }
    rows
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}
