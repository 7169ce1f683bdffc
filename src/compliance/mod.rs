//! Compliance calculators
//!
//! Every calculator is a pure function of classified entries and configuration.
//! Business-rule failures come back as data (flags, shortfalls, issue lists),
//! never as errors.

pub mod effectiveness;
pub mod foreign;
pub mod fund_summary;
pub mod jurisdiction;
pub mod quality;
pub mod section11;
pub mod snapshot;

pub use effectiveness::*;
pub use foreign::*;
pub use fund_summary::*;
pub use jurisdiction::*;
pub use quality::*;
pub use section11::*;
pub use snapshot::*;
