//! One compliance run over a partition of the ledger

use bigdecimal::BigDecimal;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::compliance::{
    foreign_contribution_check, fund_classification_summary, jurisdiction_issues,
    program_effectiveness, BalanceCheck, DataQuality, ForeignContributionResult,
    JurisdictionIssue, ProgramEffectiveness, Section11Result,
};
use crate::config::EngineConfig;
use crate::depreciation::{capital_expenditure, AssetRecord};
use crate::funds::FundTypeTotals;
use crate::types::{GroupClass, LedgerEntry, UnitSelector};
use crate::units::{class_total, select_assets, select_unit};

/// Immutable result of one compliance run
///
/// Built on demand by [`ComplianceSnapshot::compute`] and replaced wholesale on
/// the next run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    pub unit: UnitSelector,
    pub income_total: BigDecimal,
    pub expense_total: BigDecimal,
    pub section_11: Section11Result,
    pub fund_classification: Vec<FundTypeTotals>,
    pub foreign_contribution: ForeignContributionResult,
    pub jurisdiction_issues: Vec<JurisdictionIssue>,
    pub program_effectiveness: Option<ProgramEffectiveness>,
    pub balance_check: BalanceCheck,
    pub data_quality: DataQuality,
}

impl ComplianceSnapshot {
    /// Compute every compliance figure for the selected partition
    ///
    /// Asset records are partitioned like the entries, so a unit's capital
    /// application only counts the assets attributed to it.
    pub fn compute(
        entries: &[LedgerEntry],
        assets: &[AssetRecord],
        config: &EngineConfig,
        selector: &UnitSelector,
    ) -> Self {
        Self::compute_with_beneficiaries(entries, assets, config, selector, None)
    }

    pub fn compute_with_beneficiaries(
        entries: &[LedgerEntry],
        assets: &[AssetRecord],
        config: &EngineConfig,
        selector: &UnitSelector,
        beneficiaries: Option<u64>,
    ) -> Self {
        info!("Computing compliance snapshot for {}", selector.name());
        let selected = select_unit(entries, selector);
        let assets = select_assets(assets, selector);
        debug!(
            "{} of {} entries and {} assets selected",
            selected.len(),
            entries.len(),
            assets.len()
        );

        let taxonomy = &config.taxonomy;
        let income_total = class_total(&selected, taxonomy, GroupClass::Income);
        let expense_total = class_total(&selected, taxonomy, GroupClass::Expense);

        let section_11 = Section11Result::compute(
            income_total.clone(),
            expense_total.clone(),
            capital_expenditure(&assets),
            &config.accumulation_rate,
        );

        let snapshot = Self {
            unit: selector.clone(),
            section_11,
            fund_classification: fund_classification_summary(&selected),
            foreign_contribution: foreign_contribution_check(&selected),
            jurisdiction_issues: jurisdiction_issues(&selected, &assets, &config.trust_act),
            program_effectiveness: program_effectiveness(
                &selected,
                taxonomy,
                &config.program_groups,
                beneficiaries,
            ),
            balance_check: BalanceCheck::compute(&selected, taxonomy, &config.balance_tolerance),
            data_quality: DataQuality::measure(&selected),
            income_total,
            expense_total,
        };

        info!(
            "Snapshot for {}: 85% test {}, {} jurisdiction issues",
            selector.name(),
            if snapshot.section_11.compliance_85_percent {
                "met"
            } else {
                "not met"
            },
            snapshot.jurisdiction_issues.len()
        );
        snapshot
    }

    pub fn is_compliant(&self) -> bool {
        self.section_11.compliance_85_percent && self.jurisdiction_issues.is_empty()
    }
}
