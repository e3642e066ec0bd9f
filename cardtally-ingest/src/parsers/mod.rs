//! Per-issuer statement normalizers.
//!
//! Each issuer gets its own layout type. They share the three-step
//! [`StatementLayout`] shape (find the header, pick and filter the columns,
//! cleanse into records) but nothing else: header placement, cancellation
//! markers and amount quirks differ too much between issuers to share a
//! column-mapping table.

pub mod hana;
pub mod hyundai;
pub mod kb;
pub mod lotte;
pub mod samsung;
pub mod shinhan;

use std::collections::HashSet;
use tracing::debug;

use cardtally_core::{Cell, Issuer, Sheet, TransactionRecord, Workbook};

use crate::error::{NormalizeError, Result};

pub use hana::HanaLayout;
pub use hyundai::HyundaiLayout;
pub use kb::KbLayout;
pub use lotte::LotteLayout;
pub use samsung::SamsungLayout;
pub use shinhan::ShinhanLayout;

/// Three-step extraction shared by every issuer layout.
pub trait StatementLayout {
    /// Columns picked out of one data row, before cleansing.
    type Row;

    fn issuer(&self) -> Issuer;

    /// Find the header row and wrap it with the data rows beneath it.
    fn locate_header<'a>(&self, workbook: &'a Workbook) -> Result<Table<'a>>;

    /// Pick the needed columns and drop rows the issuer marks as void.
    fn select_columns(&self, table: &Table<'_>) -> Result<Vec<Self::Row>>;

    /// Parse dates and amounts and apply issuer-specific corrections.
    fn cleanse(&self, rows: Vec<Self::Row>) -> Result<Vec<TransactionRecord>>;

    fn normalize(&self, workbook: &Workbook) -> Result<Vec<TransactionRecord>> {
        let table = self.locate_header(workbook)?;
        debug!(issuer = %self.issuer(), header_row = table.header_row(), "header located");

        let rows = self.select_columns(&table)?;
        let selected = rows.len();
        let records = self.cleanse(rows)?;
        debug!(
            issuer = %self.issuer(),
            selected,
            kept = records.len(),
            "statement normalized"
        );
        Ok(records)
    }
}

/// Normalize a workbook already identified as `issuer`.
pub fn normalize(workbook: &Workbook, issuer: Issuer) -> Result<Vec<TransactionRecord>> {
    match issuer {
        Issuer::Lotte => LotteLayout.normalize(workbook),
        Issuer::Kb => KbLayout.normalize(workbook),
        Issuer::Shinhan => ShinhanLayout.normalize(workbook),
        Issuer::Hyundai => HyundaiLayout.normalize(workbook),
        Issuer::Hana => HanaLayout.normalize(workbook),
        Issuer::Samsung => SamsungLayout.normalize(workbook),
    }
}

static EMPTY: Cell = Cell::Empty;

/// A header row plus the data rows beneath it.
///
/// Header labels are compacted (whitespace removed) so columns are looked up
/// by their compact names, e.g. `국내이용금액(원)` or `결제금액`.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    issuer: Issuer,
    header_row: usize,
    header: Vec<String>,
    rows: &'a [Vec<Cell>],
}

impl<'a> Table<'a> {
    /// Use `header_row` of `sheet` as the header.
    pub fn at_row(sheet: &'a Sheet, header_row: usize, issuer: Issuer) -> Result<Self> {
        let header = sheet
            .row(header_row)
            .ok_or(NormalizeError::HeaderNotFound { issuer })?
            .iter()
            .map(Cell::compact_text)
            .collect();
        Ok(Self {
            issuer,
            header_row,
            header,
            rows: &sheet.rows[header_row + 1..],
        })
    }

    /// Use the first row of `sheet` containing every keyword as the header.
    pub fn find(sheet: &'a Sheet, keywords: &[&str], issuer: Issuer) -> Result<Self> {
        let index = sheet
            .rows
            .iter()
            .position(|row| {
                let cells: HashSet<String> = row.iter().map(Cell::compact_text).collect();
                keywords.iter().all(|k| cells.contains(*k))
            })
            .ok_or(NormalizeError::HeaderNotFound { issuer })?;
        Self::at_row(sheet, index, issuer)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }

    /// Index of the first column with this compact label.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Indices of all `names`, or an error listing every missing one.
    pub fn require(&self, names: &[&str]) -> Result<Vec<usize>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column(name) {
                Some(i) => found.push(i),
                None => missing.push((*name).to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(NormalizeError::MissingColumns {
                issuer: self.issuer,
                columns: missing,
            })
        }
    }

    /// Data rows, skipping fully blank ones.
    pub fn data_rows(&self) -> impl Iterator<Item = &'a [Cell]> + '_ {
        self.rows
            .iter()
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .map(Vec::as_slice)
    }
}

/// Cell at `index`, or an empty cell for short rows.
pub(crate) fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&EMPTY)
}

pub(crate) fn sheet_at(workbook: &Workbook, index: usize, issuer: Issuer) -> Result<&Sheet> {
    workbook
        .sheet(index)
        .ok_or(NormalizeError::MissingSheet { issuer, index })
}

/// Fail the file when rows existed but none had a usable date and amount.
pub(crate) fn settle(
    issuer: Issuer,
    records: Vec<TransactionRecord>,
    rejected: usize,
) -> Result<Vec<TransactionRecord>> {
    if records.is_empty() && rejected > 0 {
        return Err(NormalizeError::NoValidRows { issuer, rejected });
    }
    if rejected > 0 {
        debug!(%issuer, rejected, "dropped rows with unreadable date or amount");
    }
    Ok(records)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use cardtally_core::{Cell, Sheet, Workbook};

    pub fn t(value: &str) -> Cell {
        Cell::text_of(value)
    }

    pub fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| t(v)).collect()
    }

    /// `n` preamble rows of statement boilerplate.
    pub fn preamble(n: usize) -> Vec<Vec<Cell>> {
        (0..n).map(|i| vec![t(&format!("안내문 {i}"))]).collect()
    }

    pub fn single_sheet(rows: Vec<Vec<Cell>>) -> Workbook {
        Workbook::new(vec![Sheet::new("Sheet1", rows)])
    }
}
