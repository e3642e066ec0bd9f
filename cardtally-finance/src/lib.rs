//! cardtally-finance: merchant category rules, aggregation, summaries, batch pipeline, and CSV export

pub mod aggregate;
pub mod batch;
pub mod category_rules;
pub mod export;
pub mod summary;

pub use aggregate::{aggregate, AggregateOptions};
pub use batch::{BatchReport, FileOutcome, FileReport, Pipeline, StatementFile};
pub use category_rules::{CategoryRule, RuleError, RuleSet};
pub use export::{write_records_csv, write_summary_csv};
pub use summary::{CategoryTotal, IssuerTotal, Summary};
