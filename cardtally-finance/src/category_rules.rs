//! Deterministic category rules mapping merchant text to a spend category.
//!
//! An ordered list of (regex, category) pairs, searched case-insensitively
//! against the merchant. First match wins, so the issuer-specific merchants
//! listed first shadow the broad keyword rules that follow. Unmatched
//! merchants fall back to 잡비용.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const TRANSPORT: &str = "교통/주유/주차";
pub const MEDICAL: &str = "병원/약국";
pub const SHOPPING: &str = "취미/쇼핑";
pub const FOOD: &str = "음식점/카페/편의점";
pub const FIXED: &str = "고정지출";
pub const MISC: &str = "잡비용";

/// Presentation order for category totals.
pub const CATEGORY_ORDER: [&str; 6] = [TRANSPORT, MEDICAL, SHOPPING, FOOD, FIXED, MISC];

/// Specific merchants that must not be swallowed by the general rules.
const HIGH_PRIORITY: [(&str, &str); 10] = [
    ("주차장", TRANSPORT),
    ("롯데마트|달콤N|매머드|헤이듀", FOOD),
    ("기프티샷|백화점", SHOPPING),
    ("파킹|빌딩관리단|티머니|택시", TRANSPORT),
    ("KCP|보람상조|효성에프엠에스|Microsoft", FIXED),
    (r"\(주\)다날\s*-\s*카카오", FIXED),
    ("자동결제", FIXED),
    ("인터넷상거래", SHOPPING),
    ("에너지", TRANSPORT),
    ("한울곰탕", FOOD),
];

const GENERAL: [(&str, &str); 5] = [
    ("주유|충전|자동차|세차|오토오아시스|주차", TRANSPORT),
    ("병원|치과|의원|내과|약국|정형외과", MEDICAL),
    (
        "네이버페이|페이코|PAYPAL|기프티콘|쇼핑|디지털|전자|마켓|Temu|쿠팡|위메프|G마켓|11번가|인터파크|스마트스토어|번개장터",
        SHOPPING,
    ),
    (
        "카페|커피|이디야|스타벅스|편의점|씨유|CU|GS25|세븐일레븐|emart24|올리브영|식당|음식|한솥|고기|김밥|카카오|배달",
        FOOD,
    ),
    (
        r"관리비|통신|SKT|KT|LGU\+|렌탈|보험|납부|세금|등록금|교육비|마이데이터|고정지출",
        FIXED,
    ),
];

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid rule pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{pattern}' has an empty category")]
    EmptyCategory { pattern: String },

    #[error("cannot read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rules file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One (pattern, category) pair.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    regex: Regex,
    category: String,
}

impl CategoryRule {
    pub fn new(pattern: &str, category: impl Into<String>) -> Result<Self, RuleError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(RuleError::EmptyCategory {
                pattern: pattern.to_string(),
            });
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex, category })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn matches(&self, merchant: &str) -> bool {
        self.regex.is_match(merchant)
    }
}

/// Ordered rules plus the category for merchants no rule matches.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl RuleSet {
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// High-priority rules, then general rules, falling back to 잡비용.
    pub fn builtin() -> Result<Self, RuleError> {
        let rules = HIGH_PRIORITY
            .iter()
            .chain(GENERAL.iter())
            .map(|(pattern, category)| CategoryRule::new(pattern, *category))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules, MISC))
    }

    /// Parse a rules file. Loaded rules replace the built-in list.
    ///
    /// ```toml
    /// fallback = "기타"
    ///
    /// [[rule]]
    /// pattern = "주차장|파킹"
    /// category = "교통/주유/주차"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, RuleError> {
        let file: RulesFile = toml::from_str(content)?;
        let rules = file
            .rule
            .iter()
            .map(|entry| CategoryRule::new(&entry.pattern, entry.category.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules, file.fallback.unwrap_or_else(|| MISC.to_string())))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Category of the first rule matching `merchant`, else the fallback.
    pub fn categorize(&self, merchant: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(merchant))
            .map(CategoryRule::category)
            .unwrap_or(self.fallback.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rule: Vec<RuleEntry>,
    fallback: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    pattern: String,
    category: String,
}
