//! cardtally-core: canonical record, issuer set, and spreadsheet grid types

pub mod amount;
pub mod date;
pub mod issuer;
pub mod record;
pub mod workbook;

pub use amount::{parse_amount, parse_amount_text};
pub use date::{format_date, from_excel_serial, is_dotted_date, parse_date_text, DATE_FORMAT};
pub use issuer::Issuer;
pub use record::TransactionRecord;
pub use workbook::{compact, Cell, Sheet, Workbook};
