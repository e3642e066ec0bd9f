//! Card issuers whose statement exports we know how to read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported card issuers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Issuer {
    #[serde(rename = "lotte")]
    Lotte,
    #[serde(rename = "kb")]
    Kb,
    #[serde(rename = "shinhan")]
    Shinhan,
    #[serde(rename = "hyundai")]
    Hyundai,
    #[serde(rename = "hana")]
    Hana,
    #[serde(rename = "samsung")]
    Samsung,
}

/// Fragments used to map free-text card names onto an issuer, checked in order.
const CARD_NAME_FRAGMENTS: &[(&str, Issuer)] = &[
    ("국민", Issuer::Kb),
    ("신한", Issuer::Shinhan),
    ("현대", Issuer::Hyundai),
    ("하나", Issuer::Hana),
    ("롯데", Issuer::Lotte),
    ("로테", Issuer::Lotte),
    ("삼성", Issuer::Samsung),
];

impl Issuer {
    pub const ALL: [Issuer; 6] = [
        Issuer::Lotte,
        Issuer::Kb,
        Issuer::Shinhan,
        Issuer::Hyundai,
        Issuer::Hana,
        Issuer::Samsung,
    ];

    /// Canonical display label, used for sorting, summaries and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Issuer::Lotte => "롯데카드",
            Issuer::Kb => "국민카드",
            Issuer::Shinhan => "신한카드",
            Issuer::Hyundai => "현대카드",
            Issuer::Hana => "하나카드",
            Issuer::Samsung => "삼성카드",
        }
    }

    /// Label as it appears on the issuer's own statement export.
    pub fn statement_label(&self) -> &'static str {
        match self {
            Issuer::Kb => "KB국민카드",
            other => other.label(),
        }
    }

    /// Short ascii identifier (config files, JSON output).
    pub fn as_str(&self) -> &'static str {
        match self {
            Issuer::Lotte => "lotte",
            Issuer::Kb => "kb",
            Issuer::Shinhan => "shinhan",
            Issuer::Hyundai => "hyundai",
            Issuer::Hana => "hana",
            Issuer::Samsung => "samsung",
        }
    }

    /// Fuzzy-match a vendor card name ("KB국민 노리2 체크카드") to an issuer.
    pub fn from_card_name(name: &str) -> Option<Issuer> {
        CARD_NAME_FRAGMENTS
            .iter()
            .find(|(fragment, _)| name.contains(fragment))
            .map(|(_, issuer)| *issuer)
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Issuer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(issuer) = Issuer::ALL
            .iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*issuer);
        }
        Issuer::from_card_name(trimmed).ok_or_else(|| format!("unknown issuer: {s}"))
    }
}
