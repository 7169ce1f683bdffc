//! FCRA segregation of foreign contributions

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{ContributionSource, LedgerEntry};

/// Counts and totals per contribution source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignContributionResult {
    pub local_count: usize,
    pub foreign_count: usize,
    pub local_total: BigDecimal,
    pub foreign_total: BigDecimal,
    /// `None` when there are no foreign rows, so the check does not apply
    pub segregated: Option<bool>,
}

impl ForeignContributionResult {
    pub fn is_applicable(&self) -> bool {
        self.segregated.is_some()
    }
}

pub fn foreign_contribution_check(entries: &[LedgerEntry]) -> ForeignContributionResult {
    let (foreign, local): (Vec<&LedgerEntry>, Vec<&LedgerEntry>) = entries
        .iter()
        .partition(|entry| entry.source == ContributionSource::Foreign);

    ForeignContributionResult {
        local_count: local.len(),
        foreign_count: foreign.len(),
        local_total: local.iter().map(|entry| &entry.amount_cy).sum(),
        foreign_total: foreign.iter().map(|entry| &entry.amount_cy).sum(),
        segregated: (!foreign.is_empty()).then_some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_UNIT;

    #[test]
    fn test_foreign_rows_mark_segregated() {
        let entries = vec![
            LedgerEntry::new(DEFAULT_UNIT, "FC Grant", BigDecimal::from(900), BigDecimal::from(0))
                .with_source(ContributionSource::Foreign),
            LedgerEntry::new(DEFAULT_UNIT, "Local Donation", BigDecimal::from(100), BigDecimal::from(0)),
        ];
        let result = foreign_contribution_check(&entries);

        assert_eq!(result.foreign_count, 1);
        assert_eq!(result.local_count, 1);
        assert_eq!(result.foreign_total, BigDecimal::from(900));
        assert_eq!(result.segregated, Some(true));
    }

    #[test]
    fn test_no_foreign_rows_is_not_applicable() {
        let entries = vec![LedgerEntry::new(
            DEFAULT_UNIT,
            "Local Donation",
            BigDecimal::from(100),
            BigDecimal::from(0),
        )];
        let result = foreign_contribution_check(&entries);

        assert_eq!(result.segregated, None);
        assert!(!result.is_applicable());
        assert_eq!(result.foreign_total, BigDecimal::from(0));
    }
}
