//! Programme expense ratio
//!
//! The efficiency score is a bounded heuristic (ratio x 1.2, capped at 100)
//! for dashboard use. It carries no statutory meaning.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::config::ChartOfAccountsTaxonomy;
use crate::types::{CanonicalGroup, GroupClass, LedgerEntry};
use crate::units::class_total;

/// Programme share of total expenditure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramEffectiveness {
    pub program_expense: BigDecimal,
    pub total_expense: BigDecimal,
    /// Programme expense as a percentage of total expense
    pub ratio_percent: BigDecimal,
    pub admin_ratio_percent: BigDecimal,
    /// Ratio of at least 85%
    pub compliant: bool,
    pub efficiency_score: BigDecimal,
    pub beneficiaries: Option<u64>,
    pub cost_per_beneficiary: Option<BigDecimal>,
}

/// `None` when there is no expenditure to measure against
pub fn program_effectiveness(
    entries: &[LedgerEntry],
    taxonomy: &ChartOfAccountsTaxonomy,
    program_groups: &[CanonicalGroup],
    beneficiaries: Option<u64>,
) -> Option<ProgramEffectiveness> {
    let zero = BigDecimal::from(0);
    let hundred = BigDecimal::from(100);

    let total_expense = class_total(entries, taxonomy, GroupClass::Expense);
    if total_expense == zero {
        return None;
    }
    let program_expense: BigDecimal = entries
        .iter()
        .filter(|entry| program_groups.contains(&entry.group))
        .map(|entry| &entry.amount_cy)
        .sum();

    let ratio = &program_expense / &total_expense * &hundred;
    let scaled = &ratio * (BigDecimal::from(12) / BigDecimal::from(10));
    let efficiency_score = if scaled > hundred {
        hundred.clone()
    } else {
        scaled.round(2)
    };
    let cost_per_beneficiary = beneficiaries.map(|count| {
        if count == 0 {
            zero.clone()
        } else {
            (&program_expense / BigDecimal::from(count)).round(2)
        }
    });

    Some(ProgramEffectiveness {
        compliant: ratio >= BigDecimal::from(85),
        admin_ratio_percent: (&hundred - &ratio).round(2),
        ratio_percent: ratio.round(2),
        efficiency_score,
        program_expense,
        total_expense,
        beneficiaries,
        cost_per_beneficiary,
    })
}
