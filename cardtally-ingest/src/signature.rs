//! Issuer signature registry: the header keywords that identify each layout.

use std::collections::{BTreeSet, HashSet};

use cardtally_core::{compact, Issuer};

/// Header keywords identifying one issuer's statement layout.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerSignature {
    pub issuer: Issuer,
    /// Any one of these sets, fully present in a row, identifies the issuer.
    pub keyword_sets: Vec<BTreeSet<String>>,
    /// Lower-case file name fragments, used only to break ties.
    pub filename_hints: Vec<String>,
}

impl IssuerSignature {
    pub fn new(issuer: Issuer, keywords: &[&str]) -> Self {
        Self {
            issuer,
            keyword_sets: vec![keyword_set(keywords)],
            filename_hints: Vec::new(),
        }
    }

    /// Add an alternative keyword set (e.g. an older export revision).
    pub fn or_keywords(mut self, keywords: &[&str]) -> Self {
        self.keyword_sets.push(keyword_set(keywords));
        self
    }

    pub fn with_filename_hints(mut self, hints: &[&str]) -> Self {
        self.filename_hints = hints.iter().map(|h| h.to_lowercase()).collect();
        self
    }

    /// True when the row's normalized cells contain one full keyword set.
    pub fn matches(&self, cells: &HashSet<String>) -> bool {
        self.keyword_sets
            .iter()
            .any(|set| set.iter().all(|k| cells.contains(k)))
    }

    /// True when a hint occurs in the (already lower-cased) file name.
    pub fn hinted_by(&self, file_name_lower: &str) -> bool {
        self.filename_hints
            .iter()
            .any(|hint| file_name_lower.contains(hint.as_str()))
    }
}

fn keyword_set(keywords: &[&str]) -> BTreeSet<String> {
    keywords.iter().map(|k| compact(k)).collect()
}

/// Ordered list of issuer signatures. Order is significant: when one row
/// satisfies several signatures, earlier entries win.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureRegistry {
    signatures: Vec<IssuerSignature>,
}

impl SignatureRegistry {
    pub fn new(signatures: Vec<IssuerSignature>) -> Self {
        Self { signatures }
    }

    /// The layouts observed in real statement downloads.
    pub fn builtin() -> Self {
        Self::new(vec![
            IssuerSignature::new(Issuer::Lotte, &["이용일자", "이용가맹점", "업종", "이용금액"])
                .with_filename_hints(&["lotte", "veex"]),
            IssuerSignature::new(
                Issuer::Kb,
                &["이용일", "이용하신곳", "이용카드명", "국내이용금액(원)"],
            )
            .with_filename_hints(&["kb", "국민"]),
            IssuerSignature::new(Issuer::Shinhan, &["거래일자", "이용가맹점", "거래금액"])
                .with_filename_hints(&["shinhan", "신한"]),
            IssuerSignature::new(Issuer::Hyundai, &["이용일", "이용가맹점", "이용금액"])
                .with_filename_hints(&["hyundai", "현대"]),
            IssuerSignature::new(Issuer::Samsung, &["승인일자", "가맹점명", "승인금액(원)"])
                .with_filename_hints(&["samsung", "삼성"]),
            IssuerSignature::new(Issuer::Hana, &["거래일자", "가맹점명", "이용금액"])
                .with_filename_hints(&["hana", "이용상세내역"]),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &IssuerSignature> {
        self.signatures.iter()
    }

    pub fn get(&self, issuer: Issuer) -> Option<&IssuerSignature> {
        self.signatures.iter().find(|s| s.issuer == issuer)
    }

    /// Every issuer whose signature the row satisfies, in registry order.
    pub fn matching(&self, cells: &HashSet<String>) -> Vec<Issuer> {
        self.signatures
            .iter()
            .filter(|s| s.matches(cells))
            .map(|s| s.issuer)
            .collect()
    }
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
