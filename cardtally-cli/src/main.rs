use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardtally_finance::{
    write_records_csv, write_summary_csv, BatchReport, FileOutcome, Pipeline, StatementFile,
    Summary,
};
use cardtally_ingest::Detection;

mod config;
mod state;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARDTALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "cardtally",
    version,
    long_version = LONG_VERSION,
    about = "Merge Korean card statements into one categorized spending report"
)]
struct Cli {
    /// Config file (default: ~/.cardtally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes priority)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect, normalize and categorize statements, then print the totals
    Import {
        /// Statement spreadsheets (.xlsx, .xls, .ods)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write every record to this CSV
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write category and issuer totals to this CSV
        #[arg(long)]
        summary_out: Option<PathBuf>,

        /// Re-run the rules over vendor-supplied categories too
        #[arg(long)]
        recategorize_all: bool,
    },

    /// Print which issuer each statement comes from
    Detect {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the active category rules in match order
    Rules,

    /// Write a default config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_override = cli.config.as_deref();

    match cli.command {
        Command::Import {
            files,
            out,
            summary_out,
            recategorize_all,
        } => {
            let cfg = config::load_config(config_override)?;
            let mut options = cfg.aggregate_options();
            options.recategorize_all |= recategorize_all;

            let pipeline = Pipeline::new(cfg.detector(), cfg.rule_set()?).with_options(options);
            let statements = read_statements(&files)?;
            let report = pipeline.run(&statements);

            print_outcomes(&report);
            print_summary(&report.summary);

            if let Some(path) = out {
                let file = create(&path)?;
                write_records_csv(file, &report.records)
                    .with_context(|| format!("write {}", path.display()))?;
                info!(path = %path.display(), records = report.records.len(), "records written");
            }
            if let Some(path) = summary_out {
                let file = create(&path)?;
                write_summary_csv(file, &report.summary)
                    .with_context(|| format!("write {}", path.display()))?;
                info!(path = %path.display(), "summary written");
            }
        }

        Command::Detect { files, json } => {
            let cfg = config::load_config(config_override)?;
            let detector = cfg.detector();

            let mut rows = Vec::with_capacity(files.len());
            for statement in read_statements(&files)? {
                let detection = detector.detect_bytes(&statement.bytes, Some(&statement.name));
                rows.push(DetectRow {
                    file: statement.name,
                    detection,
                });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    let label = match row.detection {
                        Detection::Issuer(issuer) => issuer.statement_label(),
                        Detection::Unrecognized => "unrecognized",
                    };
                    println!("{}\t{}", row.file, label);
                }
            }
        }

        Command::Rules => {
            let cfg = config::load_config(config_override)?;
            let rules = cfg.rule_set()?;
            for (i, rule) in rules.rules().iter().enumerate() {
                println!("{:>3}  {:<12}  {}", i + 1, rule.category(), rule.pattern());
            }
            println!("  *  {:<12}  (no match)", rules.fallback());
        }

        Command::InitConfig => {
            config::init_config(config_override)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DetectRow {
    file: String,
    detection: Detection,
}

fn read_statements(paths: &[PathBuf]) -> Result<Vec<StatementFile>> {
    paths
        .iter()
        .map(|p| {
            let bytes = fs::read(p).with_context(|| format!("read {}", p.display()))?;
            Ok(StatementFile::new(display_name(p), bytes))
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn print_outcomes(report: &BatchReport) {
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Parsed { issuer, rows } => {
                println!("  ok      {}  {} ({} rows)", file.name, issuer, rows);
            }
            FileOutcome::Unrecognized => {
                println!("  skip    {}  unrecognized format", file.name);
            }
            FileOutcome::Failed { issuer, reason } => {
                println!("  failed  {}  {}: {}", file.name, issuer, reason);
            }
        }
    }
    println!(
        "\n{} parsed, {} unrecognized, {} failed\n",
        report.parsed(),
        report.unrecognized(),
        report.failed()
    );
}

fn print_summary(summary: &Summary) {
    if summary.count == 0 {
        println!("No transactions.");
        return;
    }

    println!("## By category\n");
    for c in &summary.by_category {
        println!("  {:<20} {:>14}  ({})", c.category, format_won(c.amount), c.count);
    }

    println!("\n## By card\n");
    for i in &summary.by_issuer {
        println!("  {:<20} {:>14}  ({})", i.issuer.label(), format_won(i.amount), i.count);
    }

    println!("\n  {:<20} {:>14}  ({})", "합계", format_won(summary.total), summary.count);
}

/// Thousands-separated won amount, e.g. `-1,234,500원`.
fn format_won(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}원"),
        None => format!("{sign}{grouped}원"),
    }
}
