//! Assembly of the structured report handed to the rendering collaborator

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::Classification;
use crate::compliance::{
    fingerprint, BalanceCheck, ComplianceSnapshot, DataQuality, ForeignContributionResult,
    ProgramEffectiveness, Section11Result,
};
use crate::config::{DocumentId, EngineConfig};
use crate::depreciation::{AssetRecord, AssetRegister};
use crate::funds::{FundLedger, FundMovementTotals, FundTypeTotals};
use crate::report::forms::{form_10b, form_10bb, FormOutline};
use crate::report::fund_flow::FundFlowStatement;
use crate::types::*;
use crate::units::{class_total, select_unit, unit_comparison, UnitComparisonRow};

/// Headline totals of the selected partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub unit: String,
    pub record_count: usize,
    pub income_total: BigDecimal,
    pub expense_total: BigDecimal,
    pub surplus: BigDecimal,
    pub asset_total: BigDecimal,
    pub liability_total: BigDecimal,
    pub capital_expenditure: BigDecimal,
    pub depreciation_total: BigDecimal,
    pub fund_closing_total: BigDecimal,
}

/// State trust act section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionReport {
    pub act: String,
    pub issues: Vec<String>,
    pub forms_required: Vec<DocumentId>,
}

/// Professional guidance note section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceReport {
    pub name: String,
    pub schedules_required: Vec<DocumentId>,
    pub notes_required: bool,
    /// Schedule I fund classification by fund type
    pub fund_schedule: Vec<FundMovementTotals>,
}

/// The report contract with the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub report_id: Uuid,
    pub generated_at: NaiveDateTime,
    pub organization: Organization,
    pub summary: ReportSummary,
    pub section_11: Section11Result,
    pub fund_classification: Vec<FundTypeTotals>,
    pub foreign_contribution: ForeignContributionResult,
    pub jurisdiction: JurisdictionReport,
    pub guidance: GuidanceReport,
    pub program_effectiveness: Option<ProgramEffectiveness>,
    pub balance_check: BalanceCheck,
    pub data_quality: DataQuality,
    pub classification_gaps: Vec<String>,
    /// Integrity marker over the selected entries
    pub fingerprint: String,
    pub fund_flow: FundFlowStatement,
    pub unit_comparison: Vec<UnitComparisonRow>,
    pub forms: Vec<FormOutline>,
}

/// Everything one report is built from
pub struct ReportInputs<'a> {
    pub organization: &'a Organization,
    pub classification: &'a Classification,
    pub register: &'a AssetRegister,
    pub funds: &'a FundLedger,
    pub selector: &'a UnitSelector,
    pub beneficiaries: Option<u64>,
}

pub struct ReportAssembler<'a> {
    config: &'a EngineConfig,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn assemble(&self, inputs: &ReportInputs<'_>) -> ReportData {
        let entries = &inputs.classification.entries;
        let assets: Vec<AssetRecord> = inputs
            .register
            .lines
            .iter()
            .map(|line| line.asset.clone())
            .collect();
        let snapshot = ComplianceSnapshot::compute_with_beneficiaries(
            entries,
            &assets,
            self.config,
            inputs.selector,
            inputs.beneficiaries,
        );
        self.assemble_snapshot(snapshot, inputs)
    }

    /// Build the report around an already computed snapshot
    pub fn assemble_snapshot(
        &self,
        snapshot: ComplianceSnapshot,
        inputs: &ReportInputs<'_>,
    ) -> ReportData {
        let taxonomy = &self.config.taxonomy;
        let entries = &inputs.classification.entries;
        let selected = select_unit(entries, inputs.selector);
        let register = inputs.register.select(inputs.selector);

        let summary = ReportSummary {
            unit: inputs.selector.name().to_string(),
            record_count: selected.len(),
            surplus: &snapshot.income_total - &snapshot.expense_total,
            income_total: snapshot.income_total.clone(),
            expense_total: snapshot.expense_total.clone(),
            asset_total: class_total(&selected, taxonomy, GroupClass::Asset),
            liability_total: class_total(&selected, taxonomy, GroupClass::Liability),
            capital_expenditure: register.total_additions(),
            depreciation_total: register.total_depreciation(),
            fund_closing_total: inputs.funds.total_closing(),
        };

        let classification_gaps = inputs
            .classification
            .gaps
            .iter()
            .filter(|gap| match inputs.selector {
                UnitSelector::Consolidated => true,
                UnitSelector::Named(unit) => gap.unit == *unit,
            })
            .map(|gap| gap.to_string())
            .collect();

        let trust_act = &self.config.trust_act;
        let guidance = &self.config.guidance;

        let report = ReportData {
            report_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now().naive_utc(),
            organization: inputs.organization.clone(),
            summary,
            jurisdiction: JurisdictionReport {
                act: trust_act.name.clone(),
                issues: snapshot
                    .jurisdiction_issues
                    .iter()
                    .map(|issue| issue.to_string())
                    .collect(),
                forms_required: trust_act.forms_required.clone(),
            },
            guidance: GuidanceReport {
                name: guidance.name.clone(),
                schedules_required: guidance.schedules_required.clone(),
                notes_required: guidance.notes_required,
                fund_schedule: inputs.funds.movement_totals(),
            },
            section_11: snapshot.section_11,
            fund_classification: snapshot.fund_classification,
            foreign_contribution: snapshot.foreign_contribution,
            program_effectiveness: snapshot.program_effectiveness,
            balance_check: snapshot.balance_check,
            data_quality: snapshot.data_quality,
            classification_gaps,
            fingerprint: fingerprint(&selected),
            fund_flow: FundFlowStatement::compute(&selected, taxonomy, &register),
            unit_comparison: unit_comparison(entries, taxonomy),
            forms: vec![
                form_10b(inputs.organization),
                form_10bb(inputs.organization),
            ],
        };

        info!(
            "Assembled report {} for {} ({} records)",
            report.report_id, report.summary.unit, report.summary.record_count
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassificationGap, GapKind};
    use crate::depreciation::DepreciationEngine;
    use crate::funds::FundRecord;

    fn entry(unit: &str, group: CanonicalGroup, amount: i64) -> LedgerEntry {
        LedgerEntry::new(unit, group.label(), BigDecimal::from(amount), BigDecimal::from(0))
            .with_group(group)
    }

    fn classification() -> Classification {
        Classification {
            entries: vec![
                entry("North", CanonicalGroup::DonationsAndGrants, 100000),
                entry("North", CanonicalGroup::ProgrammeExpenses, 90000),
                entry("South", CanonicalGroup::CorpusFund, 10000),
                entry("South", CanonicalGroup::CashAndBank, 20000),
                LedgerEntry::new("South", "Suspense", BigDecimal::from(5), BigDecimal::from(0)),
            ],
            gaps: vec![ClassificationGap {
                row_number: 5,
                unit: "South".to_string(),
                ledger_name: "Suspense".to_string(),
                kind: GapKind::MissingGroup,
            }],
        }
    }

    #[test]
    fn test_assemble_consolidated_report() {
        let config = EngineConfig::default();
        let classification = classification();
        let register = DepreciationEngine::new(&config.depreciation).compute(&[]);
        let funds = FundLedger::new(vec![FundRecord::new(
            "Corpus",
            FundType::Corpus,
            BigDecimal::from(10000),
            BigDecimal::from(0),
            BigDecimal::from(0),
        )]);
        let organization = Organization {
            name: "Seva Trust".to_string(),
            ..Default::default()
        };

        let report = ReportAssembler::new(&config).assemble(&ReportInputs {
            organization: &organization,
            classification: &classification,
            register: &register,
            funds: &funds,
            selector: &UnitSelector::Consolidated,
            beneficiaries: None,
        });

        assert_eq!(report.summary.unit, CONSOLIDATED);
        assert_eq!(report.summary.record_count, 5);
        assert_eq!(report.summary.surplus, BigDecimal::from(10000));
        assert!(report.section_11.compliance_85_percent);
        assert_eq!(report.jurisdiction.forms_required.len(), 3);
        assert_eq!(report.guidance.schedules_required.len(), 6);
        assert!(report.guidance.notes_required);
        assert_eq!(report.guidance.fund_schedule.len(), 1);
        assert_eq!(report.classification_gaps.len(), 1);
        assert_eq!(report.unit_comparison.len(), 3);
        assert_eq!(report.forms.len(), 2);
        assert_eq!(report.forms[0].trust_name, "Seva Trust");
    }

    #[test]
    fn test_named_unit_report_filters_gaps() {
        let config = EngineConfig::default();
        let classification = classification();
        let register = AssetRegister::default();
        let funds = FundLedger::default();
        let organization = Organization::default();

        let report = ReportAssembler::new(&config).assemble(&ReportInputs {
            organization: &organization,
            classification: &classification,
            register: &register,
            funds: &funds,
            selector: &UnitSelector::Named("North".to_string()),
            beneficiaries: Some(45),
        });

        assert_eq!(report.summary.record_count, 2);
        assert!(report.classification_gaps.is_empty());
        let effectiveness = report.program_effectiveness.unwrap();
        assert_eq!(effectiveness.cost_per_beneficiary, Some(BigDecimal::from(2000)));
        assert!(report
            .jurisdiction
            .issues
            .iter()
            .any(|issue| issue.contains("Corpus Fund")));
    }
}
