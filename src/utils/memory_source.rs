//! In-memory ledger source and report sink for testing and embedding

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::depreciation::AssetRecord;
use crate::funds::FundRecord;
use crate::ingestion::TabularDataset;
use crate::traits::*;
use crate::types::*;

fn poisoned<T>(_: T) -> EngineError {
    EngineError::Collaborator("in-memory store lock poisoned".to_string())
}

#[derive(Debug, Default)]
struct SourceData {
    dataset: TabularDataset,
    assets: Vec<AssetRecord>,
    funds: Vec<FundRecord>,
    organization: Organization,
    units: Vec<String>,
}

/// In-memory [`LedgerSource`] holding one trial balance snapshot
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Arc<RwLock<SourceData>>,
}

impl MemorySource {
    pub fn new(dataset: TabularDataset) -> Self {
        Self {
            data: Arc::new(RwLock::new(SourceData {
                dataset,
                ..Default::default()
            })),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SourceData)) -> EngineResult<()> {
        apply(&mut *self.data.write().map_err(poisoned)?);
        Ok(())
    }

    pub fn with_assets(self, assets: Vec<AssetRecord>) -> EngineResult<Self> {
        self.update(|data| data.assets = assets)?;
        Ok(self)
    }

    pub fn with_funds(self, funds: Vec<FundRecord>) -> EngineResult<Self> {
        self.update(|data| data.funds = funds)?;
        Ok(self)
    }

    pub fn with_organization(self, organization: Organization) -> EngineResult<Self> {
        self.update(|data| data.organization = organization)?;
        Ok(self)
    }

    pub fn with_units(self, units: Vec<String>) -> EngineResult<Self> {
        self.update(|data| data.units = units)?;
        Ok(self)
    }

    /// Swap in a re-imported trial balance
    pub fn replace_dataset(&self, dataset: TabularDataset) -> EngineResult<()> {
        self.update(|data| data.dataset = dataset)
    }
}

#[async_trait]
impl LedgerSource for MemorySource {
    async fn fetch_dataset(&self) -> EngineResult<TabularDataset> {
        Ok(self.data.read().map_err(poisoned)?.dataset.clone())
    }

    async fn fetch_assets(&self) -> EngineResult<Vec<AssetRecord>> {
        Ok(self.data.read().map_err(poisoned)?.assets.clone())
    }

    async fn fetch_funds(&self) -> EngineResult<Vec<FundRecord>> {
        Ok(self.data.read().map_err(poisoned)?.funds.clone())
    }

    async fn organization(&self) -> EngineResult<Organization> {
        Ok(self.data.read().map_err(poisoned)?.organization.clone())
    }

    async fn defined_units(&self) -> EngineResult<Vec<String>> {
        Ok(self.data.read().map_err(poisoned)?.units.clone())
    }
}

/// In-memory [`ReportSink`] collecting every published bundle
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    bundles: Arc<RwLock<Vec<serde_json::Value>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundles received so far, oldest first
    pub fn bundles(&self) -> Vec<serde_json::Value> {
        self.bundles
            .read()
            .map(|bundles| bundles.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut bundles) = self.bundles.write() {
            bundles.clear();
        }
    }
}

#[async_trait]
impl ReportSink for MemorySink {
    async fn publish(&mut self, bundle: &serde_json::Value) -> EngineResult<()> {
        self.bundles.write().map_err(poisoned)?.push(bundle.clone());
        Ok(())
    }
}
