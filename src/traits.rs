//! Traits for the collaborator seams and validation extensibility

use async_trait::async_trait;

use crate::depreciation::AssetRecord;
use crate::funds::FundRecord;
use crate::ingestion::{ResolvedColumns, TabularDataset, ValidatedRow, ValidationError};
use crate::types::*;

/// Supplier of raw ledger data and organization metadata
///
/// Implemented by the data-entry surface (grid editor, file importer, preset
/// store). The engine never touches files or the network itself; everything it
/// computes over arrives through this trait.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// The raw trial balance grid
    async fn fetch_dataset(&self) -> EngineResult<TabularDataset>;

    /// Fixed asset register lines; empty when no register is maintained
    async fn fetch_assets(&self) -> EngineResult<Vec<AssetRecord>>;

    /// Fund movement lines; empty when no fund schedule is maintained
    async fn fetch_funds(&self) -> EngineResult<Vec<FundRecord>>;

    /// Organization metadata for report headers and form outlines
    async fn organization(&self) -> EngineResult<Organization>;

    /// Units defined by the surrounding application, in display order
    async fn defined_units(&self) -> EngineResult<Vec<String>>;
}

/// Consumer of exported report bundles (the spreadsheet renderer)
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Receive one bundle of primitive-valued report data
    async fn publish(&mut self, bundle: &serde_json::Value) -> EngineResult<()>;
}

/// Trait for implementing trial balance row validation rules
pub trait RowValidator: Send + Sync {
    /// Check the grid and return typed rows, or a batched error
    fn validate(
        &self,
        dataset: &TabularDataset,
        columns: &ResolvedColumns,
    ) -> Result<Vec<ValidatedRow>, ValidationError>;
}
