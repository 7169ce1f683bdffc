//! Section 11 income-application test

use bigdecimal::BigDecimal;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::ChartOfAccountsTaxonomy;
use crate::types::{GroupClass, LedgerEntry};
use crate::units::class_total;
use crate::utils::numeric::percent;

/// Share of income that must be applied to the objects of the trust
pub fn application_rate() -> BigDecimal {
    percent(85)
}

/// Outcome of the Section 11 test for one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section11Result {
    pub income: BigDecimal,
    pub revenue_expense: BigDecimal,
    pub capital_expenditure: BigDecimal,
    /// Revenue expense plus capital expenditure
    pub total_application: BigDecimal,
    /// 85% of income
    pub required_application: BigDecimal,
    /// Accumulation rate times income
    pub accumulation_allowance: BigDecimal,
    /// Income left after application
    pub actual_accumulation: BigDecimal,
    pub accumulation_within_limit: bool,
    /// Application meets or exceeds the requirement
    pub compliance_85_percent: bool,
    /// Positive for excess application, negative for a shortfall
    pub shortfall_excess: BigDecimal,
    /// Shortfall that may be claimed as deemed application
    pub deemed_application_eligible: BigDecimal,
    pub taxable_income: BigDecimal,
}

impl Section11Result {
    pub fn compute(
        income: BigDecimal,
        revenue_expense: BigDecimal,
        capital_expenditure: BigDecimal,
        accumulation_rate: &BigDecimal,
    ) -> Self {
        let zero = BigDecimal::from(0);
        let total_application = &revenue_expense + &capital_expenditure;
        let required_application = &income * application_rate();
        let accumulation_allowance = &income * accumulation_rate;
        let actual_accumulation = &income - &total_application;
        let shortfall_excess = &total_application - &required_application;

        let deemed_application_eligible = if shortfall_excess < zero {
            -shortfall_excess.clone()
        } else {
            zero.clone()
        };
        let taxable = &actual_accumulation - &accumulation_allowance;
        let taxable_income = if taxable > zero { taxable } else { zero };

        let compliance_85_percent = total_application >= required_application;
        if !compliance_85_percent {
            warn!(
                "Section 11 shortfall: applied {} against required {}",
                total_application, required_application
            );
        }

        Self {
            accumulation_within_limit: actual_accumulation <= accumulation_allowance,
            income,
            revenue_expense,
            capital_expenditure,
            total_application,
            required_application,
            accumulation_allowance,
            actual_accumulation,
            compliance_85_percent,
            shortfall_excess,
            deemed_application_eligible,
            taxable_income,
        }
    }

    /// Run the test over classified entries
    ///
    /// Income is every income-set entry, revenue expense every expense-set entry.
    /// The Depreciation group is an expense-set group and so counts as revenue
    /// application alongside the year's asset additions.
    pub fn from_entries(
        entries: &[LedgerEntry],
        taxonomy: &ChartOfAccountsTaxonomy,
        capital_expenditure: BigDecimal,
        accumulation_rate: &BigDecimal,
    ) -> Self {
        Self::compute(
            class_total(entries, taxonomy, GroupClass::Income),
            class_total(entries, taxonomy, GroupClass::Expense),
            capital_expenditure,
            accumulation_rate,
        )
    }
}
