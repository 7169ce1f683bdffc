//! Integration tests for npo-compliance-core

use bigdecimal::BigDecimal;
use npo_compliance_core::{
    report_bundle, select_unit,
    utils::{MemorySink, MemorySource},
    AssetRecord, CanonicalGroup, Classifier, ColumnResolver, ComplianceEngine, ComplianceSnapshot,
    DefaultRowValidator, DepreciationEngine, EngineConfig, EngineError, FundLedger, FundRecord,
    FundType, LedgerEntry, Organization, ReportAssembler, ReportInputs, RowValidator,
    ScheduleMapper, Section11Result, TabularDataset, UnitSelector, ValidationIssue,
};
use serde_json::Value;
use std::str::FromStr;

const TRIAL_BALANCE: &str = "\
Unit,Ledger Name,Group Head,Sub Group,Fund Type,FCRA,Amount CY,Amount PY
Head Office,Corpus Fund,Corpus Fund,,Corpus,,\"5,00,000\",\"4,50,000\"
Head Office,Scholarship Fund,Restricted Funds,,Restricted,,100000,80000
Head Office,Fixed Deposits,Investments - Long Term,,,,200000,150000
Head Office,Hostel Building,\"Property, Plant & Equipment\",Immovable Properties,,,300000,310000
Head Office,Donations,Donations and Grants,Cash Donations,,,400000,350000
Head Office,FC Grant,Donations and Grants,Foreign Donations,,FCRA,100000,0
Head Office,Scholarships,Programme Expenses,Scholarships,,,350000,300000
Head Office,Salaries,Staff Payments & Benefits,,,,60000,55000
Surat,Bank,Cash and Bank Balances,Savings Bank,,,170000,120000
Surat,Fees,Fees / Subscriptions,,,,50000,45000
Surat,Relief,Programme Expenses,Relief Work,,,70000,65000
";

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

fn assets() -> Vec<AssetRecord> {
    vec![
        AssetRecord::new("Immovable Property - Hostel Building", dec("300000"), dec("20000"), dec("0"))
            .with_unit("Head Office"),
        AssetRecord::new("Movable - Computers", dec("50000"), dec("30000"), dec("0"))
            .with_unit("Surat"),
    ]
}

fn funds() -> Vec<FundRecord> {
    vec![
        FundRecord::new("Corpus Fund", FundType::Corpus, dec("450000"), dec("50000"), dec("0")),
        FundRecord::new(
            "Scholarship Fund",
            FundType::Restricted,
            dec("80000"),
            dec("120000"),
            dec("100000"),
        ),
    ]
}

fn organization() -> Organization {
    Organization {
        name: "Shree Seva Charitable Trust".to_string(),
        assessment_year: Some("2024-25".to_string()),
        pan: Some("AAATS1234F".to_string()),
        registration_number: Some("E/1234/Surat".to_string()),
        ..Default::default()
    }
}

fn only_primitives(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(only_primitives),
        Value::Object(map) => map.values().all(only_primitives),
        _ => true,
    }
}

#[test]
fn test_csv_to_report_pipeline() {
    let config = EngineConfig::default();

    // Ingestion
    let dataset = TabularDataset::from_csv_reader(TRIAL_BALANCE.as_bytes()).unwrap();
    let columns = ColumnResolver::default().resolve(&dataset.headers).unwrap();
    assert_eq!(columns.ledger_name, 1);
    assert_eq!(columns.group, Some(2));
    assert_eq!(columns.amount_cy, 6);
    assert_eq!(columns.amount_py, Some(7));

    let rows = DefaultRowValidator.validate(&dataset, &columns).unwrap();
    let classification = Classifier::new(&config.taxonomy).classify(rows);
    assert_eq!(classification.entries.len(), 11);
    assert!(classification.gaps.is_empty());

    // Computation
    let register = DepreciationEngine::new(&config.depreciation).compute(&assets());
    assert_eq!(register.total_depreciation(), dec("44000"));
    assert_eq!(register.defaulted().count(), 0);

    let snapshot = ComplianceSnapshot::compute(
        &classification.entries,
        &assets(),
        &config,
        &UnitSelector::Consolidated,
    );
    assert_eq!(snapshot.income_total, dec("550000"));
    assert_eq!(snapshot.expense_total, dec("480000"));
    assert_eq!(snapshot.section_11.total_application, dec("530000"));
    assert_eq!(snapshot.section_11.required_application, dec("467500"));
    assert!(snapshot.section_11.compliance_85_percent);
    assert!(snapshot.section_11.accumulation_within_limit);
    assert_eq!(snapshot.foreign_contribution.foreign_count, 1);
    assert_eq!(snapshot.foreign_contribution.segregated, Some(true));
    assert!(snapshot.jurisdiction_issues.is_empty());
    assert!(snapshot.balance_check.balanced);
    assert!(snapshot.is_compliant());

    let corpus = snapshot
        .fund_classification
        .iter()
        .find(|totals| totals.fund_type == FundType::Corpus)
        .unwrap();
    assert_eq!(corpus.count, 1);
    assert_eq!(corpus.total_py, dec("450000"));

    // Schedules
    let schedules =
        ScheduleMapper::new(&config.trust_act.schedules).map(&classification.entries, &register);
    let fixed_assets = &schedules[0].section("Property & Assets").unwrap().lines[0];
    assert_eq!(fixed_assets.ledger_amount, dec("300000"));
    assert_eq!(fixed_assets.net_book_value, dec("356000"));

    // Report
    let fund_ledger = FundLedger::new(funds());
    let organization = organization();
    let report = ReportAssembler::new(&config).assemble(&ReportInputs {
        organization: &organization,
        classification: &classification,
        register: &register,
        funds: &fund_ledger,
        selector: &UnitSelector::Consolidated,
        beneficiaries: Some(120),
    });
    assert_eq!(report.summary.capital_expenditure, dec("50000"));
    assert_eq!(report.summary.fund_closing_total, dec("600000"));
    assert_eq!(report.unit_comparison.len(), 3);
    assert_eq!(report.forms[0].registration_number.as_deref(), Some("E/1234/Surat"));

    let bundle = report_bundle(&report, &schedules, &register, &fund_ledger);
    assert!(only_primitives(&bundle));
    assert_eq!(bundle["report"]["section_11"]["compliance_85_percent"], true);
    assert_eq!(bundle["report"]["foreign_contribution"]["segregated"], true);
    assert_eq!(bundle["report"]["guidance"]["notes_required"], true);
    assert_eq!(bundle["schedules"].as_array().unwrap().len(), 2);
    assert_eq!(bundle["asset_register"].as_array().unwrap().len(), 2);
    assert_eq!(bundle["fund_schedule"][1]["closing"].as_f64(), Some(100000.0));
}

#[test]
fn test_section_11_shortfall_scenario() {
    let result = Section11Result::compute(
        dec("100000"),
        dec("70000"),
        dec("10000"),
        &EngineConfig::default().accumulation_rate,
    );

    assert_eq!(result.total_application, dec("80000"));
    assert_eq!(result.required_application, dec("85000"));
    assert!(!result.compliance_85_percent);
    assert_eq!(result.shortfall_excess, dec("-5000"));
    assert_eq!(result.deemed_application_eligible, dec("5000"));
}

#[test]
fn test_zero_income_boundary() {
    let result = Section11Result::compute(dec("0"), dec("12345"), dec("0"), &dec("0.15"));
    assert_eq!(result.required_application, dec("0"));
    assert_eq!(result.accumulation_allowance, dec("0"));
    assert!(result.compliance_85_percent);
}

#[test]
fn test_single_unit_aggregation_scenario() {
    let entries = vec![
        LedgerEntry::new("A", "Donations", dec("50000"), dec("0"))
            .with_group(CanonicalGroup::DonationsAndGrants),
        LedgerEntry::new("A", "Programme Expenses", dec("60000"), dec("0"))
            .with_group(CanonicalGroup::ProgrammeExpenses),
    ];

    let unit = select_unit(&entries, &UnitSelector::from_name("A"));
    let consolidated = select_unit(&entries, &UnitSelector::from_name("Consolidated"));
    assert_eq!(unit.len(), 2);
    assert_eq!(unit, consolidated);
}

#[test]
fn test_depreciation_scenario() {
    let record = AssetRecord::new("Equipment", dec("1000"), dec("500"), dec("200"));
    let line = DepreciationEngine::compute_with_rate(&record, &dec("0.15"));
    assert_eq!(line.depreciation, dec("195.00"));
}

#[test]
fn test_per_unit_figures_add_up() {
    let config = EngineConfig::default();
    let dataset = TabularDataset::from_csv_reader(TRIAL_BALANCE.as_bytes()).unwrap();
    let columns = ColumnResolver::default().resolve(&dataset.headers).unwrap();
    let rows = DefaultRowValidator.validate(&dataset, &columns).unwrap();
    let entries = Classifier::new(&config.taxonomy).classify(rows).entries;

    let assets = assets();
    let compute = |selector: UnitSelector| {
        ComplianceSnapshot::compute(&entries, &assets, &config, &selector)
    };
    let head_office = compute(UnitSelector::from_name("Head Office"));
    let surat = compute(UnitSelector::from_name("Surat"));
    let consolidated = compute(UnitSelector::Consolidated);

    assert_eq!(
        &head_office.income_total + &surat.income_total,
        consolidated.income_total
    );
    assert_eq!(
        &head_office.expense_total + &surat.expense_total,
        consolidated.expense_total
    );
    assert_eq!(
        &head_office.section_11.capital_expenditure + &surat.section_11.capital_expenditure,
        consolidated.section_11.capital_expenditure
    );
    assert_eq!(
        &head_office.section_11.total_application + &surat.section_11.total_application,
        consolidated.section_11.total_application
    );
    assert_eq!(surat.section_11.total_application, dec("100000"));
    assert_eq!(
        head_office.data_quality.total_records + surat.data_quality.total_records,
        consolidated.data_quality.total_records
    );
    assert!(surat
        .jurisdiction_issues
        .iter()
        .any(|issue| issue.to_string().contains("Corpus Fund")));
}

#[test]
fn test_validation_errors_are_batched_from_csv() {
    let data = "Particulars,Amount CY,Amount PY\nCash,100,abc\nCash,-5,0\nBank,\"1,000\",0\n";
    let dataset = TabularDataset::from_csv_reader(data.as_bytes()).unwrap();
    let columns = ColumnResolver::default().resolve(&dataset.headers).unwrap();

    let err = DefaultRowValidator.validate(&dataset, &columns).unwrap_err();
    assert_eq!(err.issues.len(), 3);
    assert!(matches!(err.issues[0], ValidationIssue::DuplicateLedgers { .. }));
    assert_eq!(
        err.issues[1],
        ValidationIssue::InvalidCurrentAmounts { rows: vec![2] }
    );
}

#[test]
fn test_config_override_from_json() {
    let config = EngineConfig::from_json(r#"{ "accumulation_rate": "0.10" }"#).unwrap();
    let entries = vec![LedgerEntry::new("Main Unit", "Donations", dec("1000"), dec("0"))
        .with_group(CanonicalGroup::DonationsAndGrants)];

    let snapshot = ComplianceSnapshot::compute(&entries, &[], &config, &UnitSelector::Consolidated);
    assert_eq!(snapshot.section_11.accumulation_allowance, dec("100"));
    assert_eq!(config.trust_act, EngineConfig::default().trust_act);
}

#[tokio::test]
async fn test_engine_publishes_bundle() {
    let dataset = TabularDataset::from_csv_reader(TRIAL_BALANCE.as_bytes()).unwrap();
    let source = MemorySource::new(dataset)
        .with_assets(assets())
        .unwrap()
        .with_funds(funds())
        .unwrap()
        .with_organization(organization())
        .unwrap()
        .with_units(vec!["Head Office".to_string(), "Surat".to_string()])
        .unwrap();
    let engine = ComplianceEngine::new(source, EngineConfig::default())
        .unwrap()
        .with_strict_validation()
        .with_beneficiaries(120);
    let mut sink = MemorySink::new();

    let run = engine
        .run_and_publish(&UnitSelector::Consolidated, &mut sink)
        .await
        .unwrap();
    assert!(run.report.section_11.compliance_85_percent);

    let bundles = sink.bundles();
    assert_eq!(bundles.len(), 1);
    let report = &bundles[0]["report"];
    assert_eq!(report["organization"]["name"], "Shree Seva Charitable Trust");
    assert_eq!(report["summary"]["record_count"], 11);
    assert_eq!(report["jurisdiction"]["issues"].as_array().unwrap().len(), 0);
    assert_eq!(report["forms"][0]["form"], "Form 10B");
    assert_eq!(report["fingerprint"].as_str().unwrap().len(), 64);
    assert!(only_primitives(&bundles[0]));
}

#[tokio::test]
async fn test_engine_per_unit_run() {
    let dataset = TabularDataset::from_csv_reader(TRIAL_BALANCE.as_bytes()).unwrap();
    let source = MemorySource::new(dataset).with_assets(assets()).unwrap();
    let engine = ComplianceEngine::new(source, EngineConfig::default()).unwrap();

    let run = engine.run(&UnitSelector::from_name("Surat")).await.unwrap();
    assert_eq!(run.report.summary.unit, "Surat");
    assert_eq!(run.register.lines.len(), 1);
    assert_eq!(run.report.summary.capital_expenditure, dec("30000"));
    assert_eq!(run.report.section_11.total_application, dec("100000"));
    assert_eq!(run.report.summary.income_total, dec("50000"));
    assert_eq!(run.report.foreign_contribution.segregated, None);
    assert_eq!(run.schedules[1].grand_total(), dec("120000"));
}

#[tokio::test]
async fn test_engine_rejects_invalid_config() {
    let mut config = EngineConfig::default();
    config.accumulation_rate = dec("1.5");
    let result = ComplianceEngine::new(MemorySource::default(), config);
    assert!(matches!(result, Err(EngineError::Config(_))));
}
