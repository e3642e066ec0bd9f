//! Format detection: which issuer produced this workbook?
//!
//! Scans sheets in order and rows top to bottom (bounded per sheet) and
//! returns the first issuer whose signature a row satisfies. This is
//! first-match, not best-match: the physical row order and the registry
//! order together decide the winner.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use cardtally_core::{Cell, Issuer, Workbook};

use crate::reader::read_workbook;
use crate::signature::SignatureRegistry;

/// Rows scanned per sheet before giving up.
pub const DEFAULT_SCAN_DEPTH: usize = 100;

/// Outcome of format detection. `Unrecognized` is a normal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "issuer")]
pub enum Detection {
    Issuer(Issuer),
    Unrecognized,
}

impl Detection {
    pub fn issuer(&self) -> Option<Issuer> {
        match self {
            Detection::Issuer(issuer) => Some(*issuer),
            Detection::Unrecognized => None,
        }
    }
}

/// Detects statement layouts against a fixed signature registry.
#[derive(Debug, Clone)]
pub struct Detector {
    registry: SignatureRegistry,
    scan_depth: usize,
    filename_hints: bool,
}

impl Detector {
    pub fn new(registry: SignatureRegistry) -> Self {
        Self {
            registry,
            scan_depth: DEFAULT_SCAN_DEPTH,
            filename_hints: true,
        }
    }

    pub fn with_scan_depth(mut self, depth: usize) -> Self {
        self.scan_depth = depth;
        self
    }

    pub fn with_filename_hints(mut self, enabled: bool) -> Self {
        self.filename_hints = enabled;
        self
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    /// Detect from workbook content alone.
    pub fn detect(&self, workbook: &Workbook) -> Detection {
        self.detect_named(workbook, None)
    }

    /// Detect with the upload's file name available for tie-breaking.
    ///
    /// The name is only consulted when the first qualifying row satisfies
    /// several signatures; it never overrides a content match.
    pub fn detect_named(&self, workbook: &Workbook, file_name: Option<&str>) -> Detection {
        for sheet in &workbook.sheets {
            for (index, row) in sheet.rows.iter().take(self.scan_depth).enumerate() {
                let cells = normalized_cells(row);
                if cells.is_empty() {
                    continue;
                }
                let candidates = self.registry.matching(&cells);
                let Some(&first) = candidates.first() else {
                    continue;
                };

                let chosen = if candidates.len() > 1 {
                    self.break_tie(&candidates, file_name).unwrap_or(first)
                } else {
                    first
                };
                debug!(
                    sheet = %sheet.name,
                    row = index,
                    issuer = %chosen,
                    candidates = candidates.len(),
                    "statement layout detected"
                );
                return Detection::Issuer(chosen);
            }
        }
        Detection::Unrecognized
    }

    /// Read and detect raw bytes. Unreadable input is reported as unrecognized.
    pub fn detect_bytes(&self, bytes: &[u8], file_name: Option<&str>) -> Detection {
        match read_workbook(bytes) {
            Ok(workbook) => self.detect_named(&workbook, file_name),
            Err(e) => {
                warn!(file = file_name.unwrap_or("<memory>"), error = %e, "unreadable workbook");
                Detection::Unrecognized
            }
        }
    }

    fn break_tie(&self, candidates: &[Issuer], file_name: Option<&str>) -> Option<Issuer> {
        if !self.filename_hints {
            return None;
        }
        let name = file_name?.to_lowercase();
        candidates.iter().copied().find(|issuer| {
            self.registry
                .get(*issuer)
                .is_some_and(|sig| sig.hinted_by(&name))
        })
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(SignatureRegistry::builtin())
    }
}

/// Non-empty cells of a row with all whitespace removed.
fn normalized_cells(row: &[Cell]) -> HashSet<String> {
    row.iter()
        .filter(|c| !c.is_empty())
        .map(Cell::compact_text)
        .filter(|s| !s.is_empty())
        .collect()
}
