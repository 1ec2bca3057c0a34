//! # Report Engine
//!
//! Wires the market data source, the aggregation engine and the report sink
//! into a cycle, and drives that cycle on the configured schedule.

pub mod error;
pub mod pipeline;
pub mod scheduler;
pub mod util;

pub use error::EngineError;
pub use pipeline::{CycleOutcome, ReportPipeline};
pub use scheduler::{FireSchedule, Scheduler};
pub use util::engine_settings;
