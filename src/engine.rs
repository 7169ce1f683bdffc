//! Pipeline orchestration over a ledger source
//!
//! The engine fetches raw data through a [`LedgerSource`], then runs the
//! synchronous stages in order: resolve columns, validate, classify, compute,
//! assemble. Ingestion errors stop the run before any figure is computed.

use log::{debug, info};

use crate::classify::{Classification, Classifier};
use crate::config::EngineConfig;
use crate::depreciation::{AssetRegister, DepreciationEngine};
use crate::funds::FundLedger;
use crate::ingestion::{ColumnResolver, DefaultRowValidator};
use crate::report::{export, ReportAssembler, ReportData, ReportInputs};
use crate::schedules::{ScheduleMapper, ScheduleTable};
use crate::traits::*;
use crate::types::*;
use crate::units::{select_assets, select_unit};
use crate::utils::StrictRowValidator;

/// Everything produced by one engine run
#[derive(Debug, Clone)]
pub struct EngineRun {
    pub classification: Classification,
    pub register: AssetRegister,
    pub funds: FundLedger,
    pub schedules: Vec<ScheduleTable>,
    pub report: ReportData,
}

impl EngineRun {
    /// Primitive-valued bundle for the rendering collaborator
    pub fn bundle(&self) -> serde_json::Value {
        export::report_bundle(&self.report, &self.schedules, &self.register, &self.funds)
    }
}

/// Compliance engine bound to one ledger source
pub struct ComplianceEngine<S: LedgerSource> {
    source: S,
    config: EngineConfig,
    resolver: ColumnResolver,
    validator: Option<Box<dyn RowValidator>>,
    strict: bool,
    beneficiaries: Option<u64>,
}

impl<S: LedgerSource> ComplianceEngine<S> {
    /// Create an engine; the configuration is validated once here
    pub fn new(source: S, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            resolver: ColumnResolver::default(),
            validator: None,
            strict: false,
            beneficiaries: None,
        })
    }

    /// Use a custom row validator instead of the standard checks
    pub fn with_validator(mut self, validator: Box<dyn RowValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Also reject blank ledger names and units the source does not define
    pub fn with_strict_validation(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Beneficiary count for the cost-per-beneficiary figure
    pub fn with_beneficiaries(mut self, beneficiaries: u64) -> Self {
        self.beneficiaries = Some(beneficiaries);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch, resolve, validate and classify the current trial balance
    pub async fn ingest(&self) -> EngineResult<Classification> {
        info!("Ingesting trial balance");
        let dataset = self.source.fetch_dataset().await?;
        let columns = self.resolver.resolve(&dataset.headers)?;
        debug!("Resolved columns: {:?}", columns.indices());

        let rows = match (&self.validator, self.strict) {
            (Some(validator), _) => validator.validate(&dataset, &columns)?,
            (None, true) => {
                let units = self.source.defined_units().await?;
                StrictRowValidator::new(units).validate(&dataset, &columns)?
            }
            (None, false) => DefaultRowValidator.validate(&dataset, &columns)?,
        };

        let classification = Classifier::new(&self.config.taxonomy).classify(rows);
        info!(
            "Ingested {} entries ({} classification gaps)",
            classification.entries.len(),
            classification.gaps.len()
        );
        Ok(classification)
    }

    /// Run the full pipeline for one partition
    pub async fn run(&self, selector: &UnitSelector) -> EngineResult<EngineRun> {
        let classification = self.ingest().await?;
        let organization = self.source.organization().await?;
        let assets = select_assets(&self.source.fetch_assets().await?, selector);
        let funds = FundLedger::new(self.source.fetch_funds().await?);

        let register = DepreciationEngine::new(&self.config.depreciation).compute(&assets);
        let selected = select_unit(&classification.entries, selector);
        let schedules =
            ScheduleMapper::new(&self.config.trust_act.schedules).map(&selected, &register);

        let report = ReportAssembler::new(&self.config).assemble(&ReportInputs {
            organization: &organization,
            classification: &classification,
            register: &register,
            funds: &funds,
            selector,
            beneficiaries: self.beneficiaries,
        });

        info!("Run complete for {}", selector.name());
        Ok(EngineRun {
            classification,
            register,
            funds,
            schedules,
            report,
        })
    }

    /// Run the pipeline and hand the exported bundle to a sink
    pub async fn run_and_publish<K: ReportSink>(
        &self,
        selector: &UnitSelector,
        sink: &mut K,
    ) -> EngineResult<EngineRun> {
        let run = self.run(selector).await?;
        sink.publish(&run.bundle()).await?;
        info!("Published report {}", run.report.report_id);
        Ok(run)
    }
}
