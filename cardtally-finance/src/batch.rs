//! Batch pipeline: read, detect and normalize each statement file, then
//! aggregate the survivors into one categorized list with totals.
//!
//! Files are independent. An unrecognized or broken file is reported in its
//! own outcome and never stops the rest of the batch.

use serde::Serialize;
use tracing::{info, warn};

use cardtally_core::{Issuer, TransactionRecord, Workbook};
use cardtally_ingest::{normalize, read_workbook, Detection, Detector};

use crate::aggregate::{aggregate, AggregateOptions};
use crate::category_rules::RuleSet;
use crate::summary::Summary;

/// One uploaded statement: display name plus raw bytes.
#[derive(Debug, Clone)]
pub struct StatementFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl StatementFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Parsed { issuer: Issuer, rows: usize },
    Unrecognized,
    Failed { issuer: Issuer, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub records: Vec<TransactionRecord>,
    pub summary: Summary,
}

impl BatchReport {
    pub fn parsed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Parsed { .. }))
    }

    pub fn unrecognized(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unrecognized))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Detector, rule set and options for one run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    detector: Detector,
    rules: RuleSet,
    options: AggregateOptions,
}

impl Pipeline {
    pub fn new(detector: Detector, rules: RuleSet) -> Self {
        Self {
            detector,
            rules,
            options: AggregateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Process files in order and aggregate everything that normalized.
    pub fn run(&self, files: &[StatementFile]) -> BatchReport {
        let mut reports = Vec::with_capacity(files.len());
        let mut batches = Vec::new();

        for file in files {
            let (outcome, records) = self.process(file);
            reports.push(FileReport {
                name: file.name.clone(),
                outcome,
            });
            batches.push(records);
        }

        self.finish(reports, batches)
    }

    /// Same as [`Pipeline::run`] for workbooks already in memory.
    pub fn run_workbooks(&self, workbooks: &[(&str, Workbook)]) -> BatchReport {
        let mut reports = Vec::with_capacity(workbooks.len());
        let mut batches = Vec::new();

        for (name, workbook) in workbooks {
            let (outcome, records) = self.process_workbook(name, workbook);
            reports.push(FileReport {
                name: name.to_string(),
                outcome,
            });
            batches.push(records);
        }

        self.finish(reports, batches)
    }

    /// Read one file. Bytes that are not a spreadsheet count as unrecognized.
    pub fn process(&self, file: &StatementFile) -> (FileOutcome, Vec<TransactionRecord>) {
        match read_workbook(&file.bytes) {
            Ok(workbook) => self.process_workbook(&file.name, &workbook),
            Err(e) => {
                warn!(file = %file.name, error = %e, "unreadable statement");
                (FileOutcome::Unrecognized, Vec::new())
            }
        }
    }

    pub fn process_workbook(
        &self,
        name: &str,
        workbook: &Workbook,
    ) -> (FileOutcome, Vec<TransactionRecord>) {
        let issuer = match self.detector.detect_named(workbook, Some(name)) {
            Detection::Issuer(issuer) => issuer,
            Detection::Unrecognized => {
                warn!(file = %name, "unrecognized statement layout");
                return (FileOutcome::Unrecognized, Vec::new());
            }
        };

        match normalize(workbook, issuer) {
            Ok(records) => {
                info!(file = %name, %issuer, rows = records.len(), "statement parsed");
                let rows = records.len();
                (FileOutcome::Parsed { issuer, rows }, records)
            }
            Err(e) => {
                warn!(file = %name, %issuer, error = %e, "statement could not be normalized");
                (
                    FileOutcome::Failed {
                        issuer,
                        reason: e.to_string(),
                    },
                    Vec::new(),
                )
            }
        }
    }

    fn finish(&self, files: Vec<FileReport>, batches: Vec<Vec<TransactionRecord>>) -> BatchReport {
        let records = aggregate(batches, &self.rules, self.options);
        let summary = Summary::from_records(&records);
        info!(
            files = files.len(),
            records = records.len(),
            total = %summary.total,
            "batch complete"
        );
        BatchReport {
            files,
            records,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtally_core::{Cell, Sheet};

    fn pipeline() -> Pipeline {
        Pipeline::new(Detector::default(), RuleSet::builtin().unwrap())
    }

    fn text_rows(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
        rows.iter()
            .map(|r| r.iter().map(|v| Cell::text_of(*v)).collect())
            .collect()
    }

    #[test]
    fn test_garbage_file_is_unrecognized() {
        let report = pipeline().run(&[StatementFile::new("notes.txt", b"hello".to_vec())]);
        assert_eq!(report.files[0].outcome, FileOutcome::Unrecognized);
        assert!(report.records.is_empty());
        assert_eq!(report.unrecognized(), 1);
    }

    #[test]
    fn test_failed_file_does_not_stop_batch() {
        // Shinhan signature matches at row 0 but the layout expects row 2
        let broken = Workbook::new(vec![Sheet::new(
            "Sheet1",
            text_rows(&[&["거래일자", "이용가맹점", "거래금액"], &["2024.04.01", "GS25", "1,000"]]),
        )]);
        let mut lotte_rows = text_rows(&[&["이용일자", "이용가맹점", "업종", "이용금액"]]);
        lotte_rows.extend(text_rows(&[&["2024.01.05", "한솥도시락", "", "5,900"]]));
        let lotte = Workbook::new(vec![Sheet::new("Sheet1", lotte_rows)]);

        let report = pipeline().run_workbooks(&[("shinhan.xlsx", broken), ("lotte.xlsx", lotte)]);
        assert!(matches!(
            report.files[0].outcome,
            FileOutcome::Failed { issuer: Issuer::Shinhan, .. }
        ));
        assert_eq!(
            report.files[1].outcome,
            FileOutcome::Parsed {
                issuer: Issuer::Lotte,
                rows: 1
            }
        );
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].category, "음식점/카페/편의점");
        assert_eq!((report.parsed(), report.failed()), (1, 1));
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_string(&FileOutcome::Parsed {
            issuer: Issuer::Kb,
            rows: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"parsed","issuer":"kb","rows":2}"#);
    }
}
