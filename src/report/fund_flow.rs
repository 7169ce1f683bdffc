//! Sources and applications of funds for the year

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::config::ChartOfAccountsTaxonomy;
use crate::depreciation::AssetRegister;
use crate::types::{CanonicalGroup, GroupClass, LedgerEntry};
use crate::units::class_total;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLine {
    pub label: String,
    pub amount: BigDecimal,
}

/// Fund flow statement; zero lines are left out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundFlowStatement {
    pub sources: Vec<FlowLine>,
    pub applications: Vec<FlowLine>,
}

impl FundFlowStatement {
    pub fn compute(
        entries: &[LedgerEntry],
        taxonomy: &ChartOfAccountsTaxonomy,
        register: &AssetRegister,
    ) -> Self {
        let surplus = class_total(entries, taxonomy, GroupClass::Income)
            - class_total(entries, taxonomy, GroupClass::Expense);

        let sources = vec![
            ("Operating Surplus", surplus),
            (
                "Donations Received",
                group_total(entries, &[CanonicalGroup::DonationsAndGrants]),
            ),
        ];
        let applications = vec![
            ("Fixed Assets", register.total_additions()),
            (
                "Investments",
                group_total(
                    entries,
                    &[
                        CanonicalGroup::InvestmentsLongTerm,
                        CanonicalGroup::InvestmentsCurrent,
                    ],
                ),
            ),
        ];

        Self {
            sources: non_zero(sources),
            applications: non_zero(applications),
        }
    }

    pub fn total_sources(&self) -> BigDecimal {
        self.sources.iter().map(|line| &line.amount).sum()
    }

    pub fn total_applications(&self) -> BigDecimal {
        self.applications.iter().map(|line| &line.amount).sum()
    }
}

fn group_total(entries: &[LedgerEntry], groups: &[CanonicalGroup]) -> BigDecimal {
    entries
        .iter()
        .filter(|entry| groups.contains(&entry.group))
        .map(|entry| &entry.amount_cy)
        .sum()
}

fn non_zero(lines: Vec<(&str, BigDecimal)>) -> Vec<FlowLine> {
    let zero = BigDecimal::from(0);
    lines
        .into_iter()
        .filter(|(_, amount)| *amount != zero)
        .map(|(label, amount)| FlowLine {
            label: label.to_string(),
            amount,
        })
        .collect()
}
