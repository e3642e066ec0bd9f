use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use cardtally_finance::{AggregateOptions, RuleSet};
use cardtally_ingest::{Detector, SignatureRegistry, DEFAULT_SCAN_DEPTH};

use crate::state::{cardtally_home, ensure_cardtally_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detect: DetectSection,
    pub categorize: CategorizeSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectSection {
    /// Rows scanned per sheet when looking for a known header
    pub scan_depth: usize,
    /// Let the file name settle rows that match more than one issuer
    pub filename_hints: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizeSection {
    /// Replace vendor-supplied categories with rule results
    pub recategorize_all: bool,
    /// TOML rule list replacing the built-in rules
    pub rules_file: Option<PathBuf>,
}

impl Default for DetectSection {
    fn default() -> Self {
        Self {
            scan_depth: DEFAULT_SCAN_DEPTH,
            filename_hints: true,
        }
    }
}

impl Config {
    pub fn detector(&self) -> Detector {
        Detector::new(SignatureRegistry::builtin())
            .with_scan_depth(self.detect.scan_depth)
            .with_filename_hints(self.detect.filename_hints)
    }

    pub fn rule_set(&self) -> Result<RuleSet> {
        match &self.categorize.rules_file {
            Some(path) => RuleSet::from_path(path)
                .with_context(|| format!("load category rules from {}", path.display())),
            None => RuleSet::builtin().context("build built-in category rules"),
        }
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            recategorize_all: self.categorize.recategorize_all,
        }
    }
}

/// `--config` if given, else `~/.cardtally/config.toml`.
pub fn config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(cardtally_home()?.join("config.toml")),
    }
}

pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let p = config_path(override_path)?;
    if !p.exists() {
        return Ok(Config::default());
    }
    load_config_file(&p)
}

fn load_config_file(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(override_path: Option<&Path>) -> Result<()> {
    let p = match override_path {
        Some(p) => p.to_path_buf(),
        None => ensure_cardtally_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
