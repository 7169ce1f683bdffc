//! Report data for the rendering collaborator

pub mod assembler;
pub mod export;
pub mod forms;
pub mod fund_flow;

pub use assembler::*;
pub use export::report_bundle;
pub use forms::*;
pub use fund_flow::*;
