//! Error types for statement reading and normalization

use cardtally_core::Issuer;
use thiserror::Error;

/// The bytes could not be opened as a spreadsheet.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("cannot open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("cannot read sheet '{name}': {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
}

/// A detected statement could not be turned into records.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("{issuer}: workbook has no sheet #{index}")]
    MissingSheet { issuer: Issuer, index: usize },

    #[error("{issuer}: header row not found")]
    HeaderNotFound { issuer: Issuer },

    #[error("{issuer}: missing columns {}", columns.join(", "))]
    MissingColumns { issuer: Issuer, columns: Vec<String> },

    #[error("{issuer}: no valid rows ({rejected} rows with unreadable date or amount)")]
    NoValidRows { issuer: Issuer, rejected: usize },

    #[error(transparent)]
    Read(#[from] ReadError),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
