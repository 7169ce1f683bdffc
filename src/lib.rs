//! # NPO Compliance Core
//!
//! A financial compliance computation engine for Indian non-profit
//! organisations: charitable trusts registered under the Income Tax Act and a
//! state public trusts act.
//!
//! ## Features
//!
//! - **Ingestion**: heuristic column resolution and batched row validation of trial balance grids
//! - **Classification**: mapping of ledger lines onto a canonical chart of accounts
//! - **Depreciation**: written-down-value depreciation with an auditable rate fallback
//! - **Funds**: fund movement schedules and per-fund-type totals
//! - **Compliance**: Section 11 application test, FCRA segregation, trust act checks
//! - **Schedules**: remapping into statutory Schedule VIII / IX line items
//! - **Reporting**: one structured report, exported as primitive-only JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use npo_compliance_core::{ComplianceSnapshot, EngineConfig, LedgerEntry, CanonicalGroup, UnitSelector};
//! use bigdecimal::BigDecimal;
//!
//! let config = EngineConfig::default();
//! let entries = vec![
//!     LedgerEntry::new("Main Unit", "Donations", BigDecimal::from(100000), BigDecimal::from(0))
//!         .with_group(CanonicalGroup::DonationsAndGrants),
//!     LedgerEntry::new("Main Unit", "Relief Work", BigDecimal::from(90000), BigDecimal::from(0))
//!         .with_group(CanonicalGroup::ProgrammeExpenses),
//! ];
//!
//! let snapshot = ComplianceSnapshot::compute(&entries, &[], &config, &UnitSelector::Consolidated);
//! assert!(snapshot.section_11.compliance_85_percent);
//! ```

pub mod classify;
pub mod compliance;
pub mod config;
pub mod depreciation;
pub mod engine;
pub mod funds;
pub mod ingestion;
pub mod report;
pub mod schedules;
pub mod traits;
pub mod types;
pub mod units;
pub mod utils;

// Re-export commonly used types
pub use classify::*;
pub use compliance::*;
pub use config::*;
pub use depreciation::*;
pub use engine::*;
pub use funds::*;
pub use ingestion::*;
pub use report::*;
pub use schedules::*;
pub use traits::*;
pub use types::*;
pub use units::*;
