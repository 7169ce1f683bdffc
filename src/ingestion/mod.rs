//! Ingestion of raw trial balance grids: column resolution and row validation

pub mod columns;
pub mod dataset;
pub mod validation;

pub use columns::*;
pub use dataset::*;
pub use validation::*;
