//! Per-category and per-issuer totals in report order.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use cardtally_core::{Issuer, TransactionRecord};

use crate::category_rules::CATEGORY_ORDER;

/// Report order for issuer totals.
pub const ISSUER_ORDER: [Issuer; 6] = [
    Issuer::Kb,
    Issuer::Hyundai,
    Issuer::Lotte,
    Issuer::Samsung,
    Issuer::Hana,
    Issuer::Shinhan,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuerTotal {
    pub issuer: Issuer,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub by_category: Vec<CategoryTotal>,
    pub by_issuer: Vec<IssuerTotal>,
    pub total: Decimal,
    pub count: usize,
}

impl Summary {
    /// Sum amounts per category and per issuer.
    ///
    /// Known categories come first in [`CATEGORY_ORDER`]; any others (e.g.
    /// vendor-supplied business types) follow in lexicographic order. Groups
    /// with no records are left out.
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut categories: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
        let mut issuers: BTreeMap<Issuer, (Decimal, usize)> = BTreeMap::new();
        let mut total = Decimal::ZERO;

        for record in records {
            let entry = categories.entry(record.category.as_str()).or_default();
            entry.0 += record.amount;
            entry.1 += 1;

            let entry = issuers.entry(record.issuer).or_default();
            entry.0 += record.amount;
            entry.1 += 1;

            total += record.amount;
        }

        let mut by_category = Vec::with_capacity(categories.len());
        for name in CATEGORY_ORDER {
            if let Some((amount, count)) = categories.remove(name) {
                by_category.push(CategoryTotal {
                    category: name.to_string(),
                    amount,
                    count,
                });
            }
        }
        by_category.extend(categories.into_iter().map(|(name, (amount, count))| CategoryTotal {
            category: name.to_string(),
            amount,
            count,
        }));

        let by_issuer = ISSUER_ORDER
            .iter()
            .filter_map(|issuer| {
                issuers.get(issuer).map(|&(amount, count)| IssuerTotal {
                    issuer: *issuer,
                    amount,
                    count,
                })
            })
            .collect();

        Self {
            by_category,
            by_issuer,
            total,
            count: records.len(),
        }
    }

    pub fn category_total(&self, category: &str) -> Option<Decimal> {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.amount)
    }

    pub fn issuer_total(&self, issuer: Issuer) -> Option<Decimal> {
        self.by_issuer
            .iter()
            .find(|i| i.issuer == issuer)
            .map(|i| i.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_rules::{FIXED, FOOD, TRANSPORT};
    use chrono::NaiveDate;

    fn rec(issuer: Issuer, category: &str, amount: i64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            issuer,
            "가맹점",
            Decimal::from(amount),
        )
        .with_category(category)
    }

    #[test]
    fn test_summary_order_and_totals() {
        let summary = Summary::from_records(&[
            rec(Issuer::Shinhan, FOOD, 4_500),
            rec(Issuer::Lotte, "커피전문점", 5_000),
            rec(Issuer::Kb, FIXED, 55_000),
            rec(Issuer::Shinhan, TRANSPORT, 2_000),
            rec(Issuer::Lotte, "가전제품", 100_000),
            rec(Issuer::Kb, FOOD, -1_500),
        ]);

        let categories: Vec<_> = summary.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec![TRANSPORT, FOOD, FIXED, "가전제품", "커피전문점"]);
        assert_eq!(summary.category_total(FOOD), Some(Decimal::from(3_000)));

        let issuers: Vec<_> = summary.by_issuer.iter().map(|i| i.issuer).collect();
        assert_eq!(issuers, vec![Issuer::Kb, Issuer::Lotte, Issuer::Shinhan]);
        assert_eq!(summary.issuer_total(Issuer::Kb), Some(Decimal::from(53_500)));
        assert_eq!(summary.issuer_total(Issuer::Hana), None);

        assert_eq!(summary.total, Decimal::from(165_000));
        assert_eq!(summary.count, 6);
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_records(&[]);
        assert!(summary.by_category.is_empty());
        assert!(summary.by_issuer.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }
}
