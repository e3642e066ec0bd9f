//! cardtally-ingest: spreadsheet reading, issuer detection, and per-issuer statement normalizers.

pub mod detect;
pub mod error;
pub mod parsers;
pub mod reader;
pub mod signature;

pub use detect::{Detection, Detector, DEFAULT_SCAN_DEPTH};
pub use error::{NormalizeError, ReadError};
pub use parsers::{normalize, StatementLayout, Table};
pub use reader::{read_workbook, read_workbook_path};
pub use signature::{IssuerSignature, SignatureRegistry};
