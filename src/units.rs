//! Unit partitioning of classified entries
//!
//! Every calculator runs over the output of [`select_unit`], so per-unit and
//! consolidated figures share a single code path.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::config::ChartOfAccountsTaxonomy;
use crate::depreciation::AssetRecord;
use crate::types::*;

/// Entries belonging to the selected partition
///
/// A named unit matches by exact string comparison. The consolidated selector
/// returns every entry.
pub fn select_unit(entries: &[LedgerEntry], selector: &UnitSelector) -> Vec<LedgerEntry> {
    match selector {
        UnitSelector::Consolidated => entries.to_vec(),
        UnitSelector::Named(name) => entries
            .iter()
            .filter(|entry| entry.unit == *name)
            .cloned()
            .collect(),
    }
}

/// Asset records belonging to the selected partition
pub fn select_assets(assets: &[AssetRecord], selector: &UnitSelector) -> Vec<AssetRecord> {
    assets
        .iter()
        .filter(|asset| asset.belongs_to(selector))
        .cloned()
        .collect()
}

/// Distinct unit names in first-seen order
pub fn units(entries: &[LedgerEntry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        if !seen.contains(&entry.unit) {
            seen.push(entry.unit.clone());
        }
    }
    seen
}

/// Sum of current-year amounts over entries in a statement set
pub fn class_total(
    entries: &[LedgerEntry],
    taxonomy: &ChartOfAccountsTaxonomy,
    class: GroupClass,
) -> BigDecimal {
    entries
        .iter()
        .filter(|entry| taxonomy.is_in(entry.group, class))
        .map(|entry| &entry.amount_cy)
        .sum()
}

/// Income and expenditure of one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitComparisonRow {
    pub unit: String,
    pub income: BigDecimal,
    pub expenses: BigDecimal,
    pub surplus: BigDecimal,
    /// Share of consolidated income; zero when consolidated income is zero
    pub income_share_percent: BigDecimal,
}

/// Side-by-side comparison of every unit plus the consolidated row last
pub fn unit_comparison(
    entries: &[LedgerEntry],
    taxonomy: &ChartOfAccountsTaxonomy,
) -> Vec<UnitComparisonRow> {
    let consolidated_income = class_total(entries, taxonomy, GroupClass::Income);

    let row = |name: &str, selected: &[LedgerEntry]| {
        let income = class_total(selected, taxonomy, GroupClass::Income);
        let expenses = class_total(selected, taxonomy, GroupClass::Expense);
        let income_share_percent = if consolidated_income == BigDecimal::from(0) {
            BigDecimal::from(0)
        } else {
            (&income / &consolidated_income * BigDecimal::from(100)).round(2)
        };
        UnitComparisonRow {
            unit: name.to_string(),
            surplus: &income - &expenses,
            income,
            expenses,
            income_share_percent,
        }
    };

    let mut rows: Vec<UnitComparisonRow> = units(entries)
        .iter()
        .map(|unit| {
            let selected = select_unit(entries, &UnitSelector::Named(unit.clone()));
            row(unit.as_str(), selected.as_slice())
        })
        .collect();
    rows.push(row(CONSOLIDATED, entries));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(unit: &str, name: &str, group: CanonicalGroup, amount: i64) -> LedgerEntry {
        LedgerEntry::new(unit, name, BigDecimal::from(amount), BigDecimal::from(0))
            .with_group(group)
    }

    #[test]
    fn test_single_unit_consolidated_matches_named() {
        let entries = vec![
            entry("A", "Donations", CanonicalGroup::DonationsAndGrants, 50000),
            entry("A", "Programme Expenses", CanonicalGroup::ProgrammeExpenses, 60000),
        ];

        let named = select_unit(&entries, &UnitSelector::Named("A".to_string()));
        let consolidated = select_unit(&entries, &UnitSelector::Consolidated);

        assert_eq!(named.len(), 2);
        assert_eq!(named, consolidated);
    }

    #[test]
    fn test_named_unit_is_exact_match() {
        let entries = vec![
            entry("Ahmedabad", "Rent", CanonicalGroup::RentIncome, 10),
            entry("ahmedabad", "Rent", CanonicalGroup::RentIncome, 20),
            entry("Ahmedabad Branch", "Rent", CanonicalGroup::RentIncome, 30),
        ];
        let selected = select_unit(&entries, &UnitSelector::from_name("Ahmedabad"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].amount_cy, BigDecimal::from(10));
    }

    #[test]
    fn test_unit_totals_add_up_to_consolidated() {
        let taxonomy = ChartOfAccountsTaxonomy::default();
        let entries = vec![
            entry("Head Office", "Donations", CanonicalGroup::DonationsAndGrants, 120000),
            entry("Head Office", "Salaries", CanonicalGroup::StaffPaymentsBenefits, 40000),
            entry("Surat", "Fees", CanonicalGroup::FeesSubscriptions, 30000),
            entry("Surat", "Relief", CanonicalGroup::ProgrammeExpenses, 45000),
            entry("Vapi", "Interest", CanonicalGroup::InterestIncome, 2500),
        ];

        for class in [GroupClass::Income, GroupClass::Expense] {
            let per_unit: BigDecimal = units(&entries)
                .iter()
                .map(|unit| {
                    let selected = select_unit(&entries, &UnitSelector::from_name(unit));
                    class_total(&selected, &taxonomy, class)
                })
                .sum();
            let consolidated = class_total(
                &select_unit(&entries, &UnitSelector::Consolidated),
                &taxonomy,
                class,
            );
            assert_eq!(per_unit, consolidated);
        }
    }

    #[test]
    fn test_unit_comparison_rows() {
        let taxonomy = ChartOfAccountsTaxonomy::default();
        let entries = vec![
            entry("North", "Donations", CanonicalGroup::DonationsAndGrants, 75),
            entry("South", "Donations", CanonicalGroup::DonationsAndGrants, 25),
            entry("South", "Admin", CanonicalGroup::AdminExpenses, 40),
        ];

        let rows = unit_comparison(&entries, &taxonomy);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].unit, "North");
        assert_eq!(rows[0].income_share_percent, BigDecimal::from(75));
        assert_eq!(rows[1].surplus, BigDecimal::from(-15));
        assert_eq!(rows[2].unit, CONSOLIDATED);
        assert_eq!(rows[2].income, BigDecimal::from(100));
        assert_eq!(rows[2].income_share_percent, BigDecimal::from(100));
    }

    #[test]
    fn test_unit_comparison_without_income() {
        let taxonomy = ChartOfAccountsTaxonomy::default();
        let entries = vec![entry("North", "Admin", CanonicalGroup::AdminExpenses, 40)];
        let rows = unit_comparison(&entries, &taxonomy);
        assert!(rows
            .iter()
            .all(|row| row.income_share_percent == BigDecimal::from(0)));
    }
}
