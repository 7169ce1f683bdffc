//! Data quality metrics, balance check and data fingerprint

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ChartOfAccountsTaxonomy;
use crate::types::{GroupClass, LedgerEntry};
use crate::units::class_total;

/// Coverage counts for one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub total_records: usize,
    pub records_with_cy: usize,
    pub records_with_py: usize,
    /// Records carrying a canonical group
    pub classified_records: usize,
    pub total_cy: BigDecimal,
    pub total_py: BigDecimal,
}

impl DataQuality {
    pub fn measure(entries: &[LedgerEntry]) -> Self {
        let zero = BigDecimal::from(0);
        Self {
            total_records: entries.len(),
            records_with_cy: entries.iter().filter(|e| e.amount_cy != zero).count(),
            records_with_py: entries.iter().filter(|e| e.amount_py != zero).count(),
            classified_records: entries.iter().filter(|e| e.group.is_classified()).count(),
            total_cy: entries.iter().map(|e| &e.amount_cy).sum(),
            total_py: entries.iter().map(|e| &e.amount_py).sum(),
        }
    }
}

/// Assets against funds, liabilities and the year's surplus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub assets: BigDecimal,
    pub liabilities: BigDecimal,
    pub surplus: BigDecimal,
    /// Assets less liabilities and surplus
    pub difference: BigDecimal,
    pub balanced: bool,
}

impl BalanceCheck {
    /// Balanced when the absolute difference is below the tolerance
    pub fn compute(
        entries: &[LedgerEntry],
        taxonomy: &ChartOfAccountsTaxonomy,
        tolerance: &BigDecimal,
    ) -> Self {
        let assets = class_total(entries, taxonomy, GroupClass::Asset);
        let liabilities = class_total(entries, taxonomy, GroupClass::Liability);
        let surplus = class_total(entries, taxonomy, GroupClass::Income)
            - class_total(entries, taxonomy, GroupClass::Expense);
        let difference = &assets - (&liabilities + &surplus);

        Self {
            balanced: difference.abs() < *tolerance,
            assets,
            liabilities,
            surplus,
            difference,
        }
    }
}

/// SHA-256 over the record count and current/prior-year totals, hex encoded
pub fn fingerprint(entries: &[LedgerEntry]) -> String {
    let total_cy: BigDecimal = entries.iter().map(|e| &e.amount_cy).sum();
    let total_py: BigDecimal = entries.iter().map(|e| &e.amount_py).sum();

    let mut hasher = Sha256::new();
    hasher.update(entries.len().to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(total_cy.normalized().to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(total_py.normalized().to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalGroup, DEFAULT_UNIT};
    use std::str::FromStr;

    fn entry(group: CanonicalGroup, cy: &str, py: &str) -> LedgerEntry {
        LedgerEntry::new(
            DEFAULT_UNIT,
            group.label(),
            BigDecimal::from_str(cy).unwrap(),
            BigDecimal::from_str(py).unwrap(),
        )
        .with_group(group)
    }

    #[test]
    fn test_data_quality_counts() {
        let entries = vec![
            entry(CanonicalGroup::CashAndBank, "100", "0"),
            entry(CanonicalGroup::CorpusFund, "0", "50"),
            LedgerEntry::new(DEFAULT_UNIT, "Suspense", BigDecimal::from(5), BigDecimal::from(5)),
        ];
        let quality = DataQuality::measure(&entries);

        assert_eq!(quality.total_records, 3);
        assert_eq!(quality.records_with_cy, 2);
        assert_eq!(quality.records_with_py, 2);
        assert_eq!(quality.classified_records, 2);
        assert_eq!(quality.total_cy, BigDecimal::from(105));
    }

    #[test]
    fn test_balance_within_tolerance() {
        let taxonomy = ChartOfAccountsTaxonomy::default();
        let entries = vec![
            entry(CanonicalGroup::CashAndBank, "10500.50", "0"),
            entry(CanonicalGroup::CorpusFund, "10000", "0"),
            entry(CanonicalGroup::DonationsAndGrants, "1000", "0"),
            entry(CanonicalGroup::ProgrammeExpenses, "500", "0"),
        ];
        let check = BalanceCheck::compute(&entries, &taxonomy, &BigDecimal::from(1));

        assert_eq!(check.surplus, BigDecimal::from(500));
        assert_eq!(check.difference, BigDecimal::from_str("0.50").unwrap());
        assert!(check.balanced);
    }

    #[test]
    fn test_imbalance_is_reported() {
        let taxonomy = ChartOfAccountsTaxonomy::default();
        let entries = vec![
            entry(CanonicalGroup::CashAndBank, "100", "0"),
            entry(CanonicalGroup::CorpusFund, "99", "0"),
        ];
        let check = BalanceCheck::compute(&entries, &taxonomy, &BigDecimal::from(1));
        assert!(!check.balanced);
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let entries = vec![entry(CanonicalGroup::CashAndBank, "100.00", "5")];
        let same_value = vec![entry(CanonicalGroup::CashAndBank, "100", "5.0")];
        let changed = vec![entry(CanonicalGroup::CashAndBank, "100.01", "5")];

        let print = fingerprint(&entries);
        assert_eq!(print.len(), 64);
        assert_eq!(print, fingerprint(&same_value));
        assert_ne!(print, fingerprint(&changed));
    }
}
