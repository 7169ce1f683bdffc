//! Fund movement tracking and per-fund-type totals

use bigdecimal::BigDecimal;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::{FundType, LedgerEntry};

/// Movement of one fund over the year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub name: String,
    pub fund_type: FundType,
    pub opening: BigDecimal,
    pub received: BigDecimal,
    pub utilized: BigDecimal,
}

impl FundRecord {
    pub fn new(
        name: &str,
        fund_type: FundType,
        opening: BigDecimal,
        received: BigDecimal,
        utilized: BigDecimal,
    ) -> Self {
        Self {
            name: name.to_string(),
            fund_type,
            opening,
            received,
            utilized,
        }
    }

    /// Closing balance, always derived from the movement
    pub fn closing(&self) -> BigDecimal {
        &self.opening + &self.received - &self.utilized
    }
}

/// Movement totals for every fund of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMovementTotals {
    pub fund_type: FundType,
    pub count: usize,
    pub opening: BigDecimal,
    pub received: BigDecimal,
    pub utilized: BigDecimal,
    pub closing: BigDecimal,
}

impl FundMovementTotals {
    fn empty(fund_type: FundType) -> Self {
        Self {
            fund_type,
            count: 0,
            opening: BigDecimal::from(0),
            received: BigDecimal::from(0),
            utilized: BigDecimal::from(0),
            closing: BigDecimal::from(0),
        }
    }
}

/// Fund schedule built from fund records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundLedger {
    records: Vec<FundRecord>,
}

impl FundLedger {
    pub fn new(records: Vec<FundRecord>) -> Self {
        debug!("Fund ledger created with {} funds", records.len());
        Self { records }
    }

    pub fn records(&self) -> &[FundRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Movement totals per fund type, in fund type order, skipping absent types
    pub fn movement_totals(&self) -> Vec<FundMovementTotals> {
        FundType::ALL
            .iter()
            .filter_map(|fund_type| {
                let mut totals = FundMovementTotals::empty(*fund_type);
                for record in self.records.iter().filter(|r| r.fund_type == *fund_type) {
                    totals.count += 1;
                    totals.opening += &record.opening;
                    totals.received += &record.received;
                    totals.utilized += &record.utilized;
                    totals.closing += record.closing();
                }
                (totals.count > 0).then_some(totals)
            })
            .collect()
    }

    pub fn total_closing(&self) -> BigDecimal {
        self.records.iter().map(FundRecord::closing).sum()
    }
}

/// Ledger-line totals for one fund type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundTypeTotals {
    pub fund_type: FundType,
    pub count: usize,
    pub total_cy: BigDecimal,
    pub total_py: BigDecimal,
}

/// Count and current/prior-year totals of ledger entries per fund type
///
/// Every fund type is listed, with zero totals when no entry carries it.
pub fn fund_type_totals(entries: &[LedgerEntry]) -> Vec<FundTypeTotals> {
    FundType::ALL
        .iter()
        .map(|fund_type| {
            let matching: Vec<&LedgerEntry> = entries
                .iter()
                .filter(|entry| entry.fund_type == *fund_type)
                .collect();
            FundTypeTotals {
                fund_type: *fund_type,
                count: matching.len(),
                total_cy: matching.iter().map(|entry| &entry.amount_cy).sum(),
                total_py: matching.iter().map(|entry| &entry.amount_py).sum(),
            }
        })
        .collect()
}
