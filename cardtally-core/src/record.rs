//! Canonical transaction record produced by every statement normalizer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::format_date;
use crate::issuer::Issuer;

/// One card transaction, in the shape shared by all issuers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Transaction date (rendered as YYYY.MM.DD)
    pub date: NaiveDate,
    /// Source issuer
    pub issuer: Issuer,
    /// Spend category; empty until categorized
    pub category: String,
    /// Merchant / payee text as printed on the statement
    pub merchant: String,
    /// Positive = charge, negative = reversal or refund
    pub amount: Decimal,
}

impl TransactionRecord {
    /// Create an uncategorized record
    pub fn new(
        date: NaiveDate,
        issuer: Issuer,
        merchant: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            issuer,
            category: String::new(),
            merchant: merchant.into(),
            amount,
        }
    }

    /// Attach a category (vendor-supplied or from the rule set)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn is_categorized(&self) -> bool {
        !self.category.is_empty()
    }

    /// Returns true for reversals and refunds
    pub fn is_refund(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn date_label(&self) -> String {
        format_date(self.date)
    }
}
