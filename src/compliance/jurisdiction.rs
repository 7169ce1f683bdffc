//! State trust act presence checks

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::JurisdictionRules;
use crate::depreciation::AssetRecord;
use crate::types::LedgerEntry;

/// A requirement of the trust act that the data does not meet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JurisdictionIssue {
    /// No row in any of the groups behind a required heading
    MissingGroup { act: String, label: String },
    MissingImmovableAssets { act: String },
    MissingMovableAssets { act: String },
}

impl fmt::Display for JurisdictionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JurisdictionIssue::MissingGroup { act, label } => {
                write!(f, "{} requires '{}' details, but none were found", act, label)
            }
            JurisdictionIssue::MissingImmovableAssets { act } => write!(
                f,
                "{} requires immovable property details in the asset register",
                act
            ),
            JurisdictionIssue::MissingMovableAssets { act } => write!(
                f,
                "{} requires movable property details in the asset register",
                act
            ),
        }
    }
}

/// Check required groups, and the asset register when one is supplied
///
/// One issue per unmet requirement; an empty result means the checks passed.
pub fn jurisdiction_issues(
    entries: &[LedgerEntry],
    assets: &[AssetRecord],
    rules: &JurisdictionRules,
) -> Vec<JurisdictionIssue> {
    let mut issues: Vec<JurisdictionIssue> = rules
        .required_groups
        .iter()
        .filter(|rule| {
            !entries
                .iter()
                .any(|entry| rule.any_of.contains(&entry.group))
        })
        .map(|rule| JurisdictionIssue::MissingGroup {
            act: rules.name.clone(),
            label: rule.label.clone(),
        })
        .collect();

    if rules.check_asset_register && !assets.is_empty() {
        if !assets.iter().any(AssetRecord::is_immovable) {
            issues.push(JurisdictionIssue::MissingImmovableAssets {
                act: rules.name.clone(),
            });
        }
        if !assets.iter().any(AssetRecord::is_movable) {
            issues.push(JurisdictionIssue::MissingMovableAssets {
                act: rules.name.clone(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalGroup, DEFAULT_UNIT};
    use bigdecimal::BigDecimal;

    fn entry(group: CanonicalGroup) -> LedgerEntry {
        LedgerEntry::new(DEFAULT_UNIT, group.label(), BigDecimal::from(1), BigDecimal::from(0))
            .with_group(group)
    }

    fn asset(name: &str) -> AssetRecord {
        AssetRecord::new(name, BigDecimal::from(1), BigDecimal::from(0), BigDecimal::from(0))
    }

    #[test]
    fn test_each_missing_group_is_reported() {
        let rules = JurisdictionRules::default();
        let issues = jurisdiction_issues(&[entry(CanonicalGroup::CorpusFund)], &[], &rules);

        let labels: Vec<String> = issues
            .iter()
            .map(|issue| match issue {
                JurisdictionIssue::MissingGroup { label, .. } => label.clone(),
                other => panic!("unexpected issue {other:?}"),
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Restricted Funds", "Property, Plant & Equipment", "Investments"]
        );
        assert!(issues[0].to_string().starts_with("Gujarat Public Trusts Act requires"));
    }

    #[test]
    fn test_complete_data_has_no_issues() {
        let rules = JurisdictionRules::default();
        let entries = vec![
            entry(CanonicalGroup::CorpusFund),
            entry(CanonicalGroup::RestrictedFunds),
            entry(CanonicalGroup::PropertyPlantEquipment),
            entry(CanonicalGroup::InvestmentsCurrent),
        ];
        let assets = vec![asset("Immovable - Land"), asset("Movable - Vehicles")];
        assert!(jurisdiction_issues(&entries, &assets, &rules).is_empty());
    }

    #[test]
    fn test_asset_register_checks_only_when_supplied() {
        let rules = JurisdictionRules::default();
        let entries = vec![
            entry(CanonicalGroup::CorpusFund),
            entry(CanonicalGroup::RestrictedFunds),
            entry(CanonicalGroup::PropertyPlantEquipment),
            entry(CanonicalGroup::InvestmentsLongTerm),
        ];

        let issues = jurisdiction_issues(&entries, &[asset("Immovable Building")], &rules);
        assert_eq!(
            issues,
            vec![JurisdictionIssue::MissingMovableAssets {
                act: rules.name.clone()
            }]
        );

        let issues = jurisdiction_issues(&entries, &[asset("Computers")], &rules);
        assert_eq!(issues.len(), 2);
    }
}
