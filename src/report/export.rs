//! Conversion of report data into primitive-only JSON for the renderer
//!
//! Decimals become JSON numbers, identifiers and dates become strings. No
//! engine type crosses this boundary.

use bigdecimal::BigDecimal;
use log::warn;
use serde_json::{json, Map, Value};

use crate::config::DocumentId;
use crate::depreciation::AssetRegister;
use crate::funds::{FundLedger, FundMovementTotals, FundTypeTotals};
use crate::report::assembler::ReportData;
use crate::report::forms::FormOutline;
use crate::report::fund_flow::FlowLine;
use crate::schedules::ScheduleTable;
use crate::utils::numeric::to_f64;

/// Decimals outside the `f64` range are exported as their exact text
fn num(value: &BigDecimal) -> Value {
    match to_f64(value) {
        Some(float) => json!(float),
        None => {
            warn!("Amount {} exceeds the numeric export range, exporting as text", value);
            Value::String(value.to_string())
        }
    }
}

fn documents(items: &[DocumentId]) -> Value {
    items
        .iter()
        .map(|doc| json!({ "id": doc.id, "title": doc.title }))
        .collect()
}

fn flow_lines(lines: &[FlowLine]) -> Value {
    lines
        .iter()
        .map(|line| json!({ "label": line.label, "amount": num(&line.amount) }))
        .collect()
}

fn fund_type_rows(rows: &[FundTypeTotals]) -> Value {
    rows.iter()
        .map(|row| {
            json!({
                "fund_type": row.fund_type.label(),
                "count": row.count,
                "total_cy": num(&row.total_cy),
                "total_py": num(&row.total_py),
            })
        })
        .collect()
}

fn movement_rows(rows: &[FundMovementTotals]) -> Value {
    rows.iter()
        .map(|row| {
            json!({
                "fund_type": row.fund_type.label(),
                "count": row.count,
                "opening": num(&row.opening),
                "received": num(&row.received),
                "utilized": num(&row.utilized),
                "closing": num(&row.closing),
            })
        })
        .collect()
}

fn form(outline: &FormOutline) -> Value {
    json!({
        "form": outline.form,
        "assessment_year": outline.assessment_year,
        "trust_name": outline.trust_name,
        "pan": outline.pan,
        "registration_number": outline.registration_number,
        "sections": outline
            .sections
            .iter()
            .map(|section| json!({ "number": section.number, "title": section.title }))
            .collect::<Vec<_>>(),
    })
}

/// The report itself
pub fn report_value(report: &ReportData) -> Value {
    let summary = &report.summary;
    let s11 = &report.section_11;
    let foreign = &report.foreign_contribution;
    let balance = &report.balance_check;
    let quality = &report.data_quality;

    let effectiveness = match &report.program_effectiveness {
        Some(result) => json!({
            "program_expense": num(&result.program_expense),
            "total_expense": num(&result.total_expense),
            "ratio_percent": num(&result.ratio_percent),
            "admin_ratio_percent": num(&result.admin_ratio_percent),
            "compliant": result.compliant,
            "efficiency_score": num(&result.efficiency_score),
            "beneficiaries": result.beneficiaries,
            "cost_per_beneficiary": result.cost_per_beneficiary.as_ref().map(num),
        }),
        None => Value::Null,
    };

    let organization = json!({
        "name": report.organization.name,
        "period_end": report.organization.period_end.map(|date| date.to_string()),
        "assessment_year": report.organization.assessment_year,
        "pan": report.organization.pan,
        "registration_number": report.organization.registration_number,
    });
    let summary = json!({
        "unit": summary.unit,
        "record_count": summary.record_count,
        "income_total": num(&summary.income_total),
        "expense_total": num(&summary.expense_total),
        "surplus": num(&summary.surplus),
        "asset_total": num(&summary.asset_total),
        "liability_total": num(&summary.liability_total),
        "capital_expenditure": num(&summary.capital_expenditure),
        "depreciation_total": num(&summary.depreciation_total),
        "fund_closing_total": num(&summary.fund_closing_total),
    });
    let section_11 = json!({
        "income": num(&s11.income),
        "revenue_expense": num(&s11.revenue_expense),
        "capital_expenditure": num(&s11.capital_expenditure),
        "total_application": num(&s11.total_application),
        "required_application": num(&s11.required_application),
        "accumulation_allowance": num(&s11.accumulation_allowance),
        "actual_accumulation": num(&s11.actual_accumulation),
        "accumulation_within_limit": s11.accumulation_within_limit,
        "compliance_85_percent": s11.compliance_85_percent,
        "shortfall_excess": num(&s11.shortfall_excess),
        "deemed_application_eligible": num(&s11.deemed_application_eligible),
        "taxable_income": num(&s11.taxable_income),
    });
    let foreign_contribution = json!({
        "local_count": foreign.local_count,
        "foreign_count": foreign.foreign_count,
        "local_total": num(&foreign.local_total),
        "foreign_total": num(&foreign.foreign_total),
        "segregated": foreign.segregated,
    });
    let jurisdiction = json!({
        "act": report.jurisdiction.act,
        "issues": report.jurisdiction.issues,
        "forms_required": documents(&report.jurisdiction.forms_required),
    });
    let guidance = json!({
        "name": report.guidance.name,
        "schedules_required": documents(&report.guidance.schedules_required),
        "notes_required": report.guidance.notes_required,
        "fund_schedule": movement_rows(&report.guidance.fund_schedule),
    });
    let balance_check = json!({
        "assets": num(&balance.assets),
        "liabilities": num(&balance.liabilities),
        "surplus": num(&balance.surplus),
        "difference": num(&balance.difference),
        "balanced": balance.balanced,
    });
    let data_quality = json!({
        "total_records": quality.total_records,
        "records_with_cy": quality.records_with_cy,
        "records_with_py": quality.records_with_py,
        "classified_records": quality.classified_records,
        "total_cy": num(&quality.total_cy),
        "total_py": num(&quality.total_py),
    });
    let fund_flow = json!({
        "sources": flow_lines(&report.fund_flow.sources),
        "applications": flow_lines(&report.fund_flow.applications),
    });
    let unit_comparison: Value = report
        .unit_comparison
        .iter()
        .map(|row| {
            json!({
                "unit": row.unit,
                "income": num(&row.income),
                "expenses": num(&row.expenses),
                "surplus": num(&row.surplus),
                "income_share_percent": num(&row.income_share_percent),
            })
        })
        .collect();

    let sections = [
        ("report_id", json!(report.report_id.to_string())),
        (
            "generated_at",
            json!(report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        ("organization", organization),
        ("summary", summary),
        ("section_11", section_11),
        ("fund_classification", fund_type_rows(&report.fund_classification)),
        ("foreign_contribution", foreign_contribution),
        ("jurisdiction", jurisdiction),
        ("guidance", guidance),
        ("program_effectiveness", effectiveness),
        ("balance_check", balance_check),
        ("data_quality", data_quality),
        ("classification_gaps", json!(report.classification_gaps)),
        ("fingerprint", json!(report.fingerprint)),
        ("fund_flow", fund_flow),
        ("unit_comparison", unit_comparison),
        ("forms", report.forms.iter().map(form).collect::<Value>()),
    ];
    Value::Object(
        sections
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Map<String, Value>>(),
    )
}

pub fn schedule_value(table: &ScheduleTable) -> Value {
    json!({
        "id": table.id,
        "title": table.title,
        "sections": table
            .sections
            .iter()
            .map(|section| json!({
                "heading": section.heading,
                "lines": section
                    .lines
                    .iter()
                    .map(|line| json!({ "label": line.label, "amount": num(&line.amount) }))
                    .collect::<Vec<_>>(),
                "total": num(&section.total),
            }))
            .collect::<Vec<_>>(),
        "grand_total": num(&table.grand_total()),
    })
}

pub fn asset_register_value(register: &AssetRegister) -> Value {
    register
        .lines
        .iter()
        .map(|line| {
            json!({
                "name": line.asset.name,
                "category": line.category,
                "rate": num(&line.rate),
                "rate_defaulted": line.rate_defaulted,
                "opening_gross": num(&line.asset.opening_gross),
                "additions": num(&line.asset.additions),
                "deletions": num(&line.asset.deletions),
                "closing_gross": num(&line.closing_gross),
                "opening_accumulated": num(&line.asset.opening_accumulated),
                "depreciation": num(&line.depreciation),
                "closing_accumulated": num(&line.closing_accumulated),
                "net_block": num(&line.net_block),
            })
        })
        .collect()
}

pub fn fund_schedule_value(funds: &FundLedger) -> Value {
    funds
        .records()
        .iter()
        .map(|fund| {
            json!({
                "name": fund.name,
                "fund_type": fund.fund_type.label(),
                "opening": num(&fund.opening),
                "received": num(&fund.received),
                "utilized": num(&fund.utilized),
                "closing": num(&fund.closing()),
            })
        })
        .collect()
}

/// Complete bundle for the renderer: report, schedules, asset register and funds
pub fn report_bundle(
    report: &ReportData,
    schedules: &[ScheduleTable],
    register: &AssetRegister,
    funds: &FundLedger,
) -> Value {
    json!({
        "report": report_value(report),
        "schedules": schedules.iter().map(schedule_value).collect::<Vec<_>>(),
        "asset_register": asset_register_value(register),
        "fund_schedule": fund_schedule_value(funds),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JurisdictionRules;
    use crate::depreciation::{AssetRecord, DepreciationEngine};
    use crate::funds::FundRecord;
    use crate::schedules::ScheduleMapper;
    use crate::classify::Classification;
    use crate::config::EngineConfig;
    use crate::report::assembler::{ReportAssembler, ReportInputs};
    use crate::types::{CanonicalGroup, FundType, LedgerEntry, Organization, UnitSelector, DEFAULT_UNIT};
    use crate::utils::numeric::percent;
    use std::str::FromStr;

    fn approx(value: &Value, expected: f64) -> bool {
        value
            .as_f64()
            .map(|actual| (actual - expected).abs() < 1e-9)
            .unwrap_or(false)
    }

    fn only_primitives(value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(only_primitives),
            Value::Object(map) => map.values().all(only_primitives),
            _ => true,
        }
    }

    #[test]
    fn test_asset_register_export() {
        let register = DepreciationEngine::new(&Default::default()).compute(&[AssetRecord::new(
            "Computers",
            BigDecimal::from(1000),
            BigDecimal::from(0),
            BigDecimal::from(0),
        )]);
        let value = asset_register_value(&register);

        assert_eq!(value[0]["category"], "Computers");
        assert!(approx(&value[0]["rate"], 0.4));
        assert!(approx(&value[0]["depreciation"], 400.0));
        assert_eq!(value[0]["rate_defaulted"], false);
    }

    #[test]
    fn test_schedule_and_fund_export() {
        let rules = JurisdictionRules::default();
        let entries = vec![LedgerEntry::new(
            DEFAULT_UNIT,
            "Bank",
            BigDecimal::from(2500),
            BigDecimal::from(0),
        )
        .with_group(CanonicalGroup::CashAndBank)];
        let tables = ScheduleMapper::new(&rules.schedules).map(&entries, &AssetRegister::default());
        let funds = FundLedger::new(vec![FundRecord::new(
            "Medical Aid",
            FundType::Restricted,
            BigDecimal::from(100),
            BigDecimal::from(50),
            BigDecimal::from(25),
        )]);

        let schedule = schedule_value(&tables[0]);
        assert_eq!(schedule["id"], "Sch VIII");
        assert!(approx(&schedule["grand_total"], 2500.0));

        let fund_rows = fund_schedule_value(&funds);
        assert_eq!(fund_rows[0]["fund_type"], "Restricted");
        assert!(approx(&fund_rows[0]["closing"], 125.0));

        assert!(approx(&num(&percent(15)), 0.15));
    }

    #[test]
    fn test_report_bundle_is_primitive_only() {
        let config = EngineConfig::default();
        let classification = Classification {
            entries: vec![
                LedgerEntry::new(DEFAULT_UNIT, "Donations", BigDecimal::from(1000), BigDecimal::from(0))
                    .with_group(CanonicalGroup::DonationsAndGrants),
                LedgerEntry::new(DEFAULT_UNIT, "Relief", BigDecimal::from(900), BigDecimal::from(0))
                    .with_group(CanonicalGroup::ProgrammeExpenses),
            ],
            gaps: Vec::new(),
        };
        let register = DepreciationEngine::new(&config.depreciation).compute(&[AssetRecord::new(
            "Computers",
            BigDecimal::from(1000),
            BigDecimal::from(0),
            BigDecimal::from(0),
        )]);
        let funds = FundLedger::new(vec![FundRecord::new(
            "Medical Aid",
            FundType::Restricted,
            BigDecimal::from(100),
            BigDecimal::from(50),
            BigDecimal::from(25),
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
            beneficiaries: Some(30),
        });
        let tables = ScheduleMapper::new(&config.trust_act.schedules)
            .map(&classification.entries, &register);

        let bundle = report_bundle(&report, &tables, &register, &funds);
        assert!(only_primitives(&bundle));
        assert_eq!(bundle["report"]["report_id"], report.report_id.to_string());
        assert!(approx(&bundle["report"]["summary"]["surplus"], 100.0));
        assert!(approx(
            &bundle["report"]["program_effectiveness"]["cost_per_beneficiary"],
            30.0
        ));
        assert_eq!(bundle["schedules"].as_array().map(Vec::len), Some(2));
        assert_eq!(bundle["asset_register"][0]["category"], "Computers");
        assert!(approx(&bundle["fund_schedule"][0]["closing"], 125.0));
    }

    #[test]
    fn test_out_of_range_amount_exports_as_text() {
        let huge = BigDecimal::from_str("1e400").unwrap();
        assert_eq!(num(&huge), Value::String(huge.to_string()));
    }
}
