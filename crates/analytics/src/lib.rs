//! # Market Report Analytics
//!
//! This crate turns one market snapshot into the metrics of a report: the
//! volume leader, best and worst movers, basket costs, the one-day
//! investment return and the supply, market cap and listing date rankings.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** It has no knowledge of HTTP, files or time. It depends
//!   only on `core-types`.
//! - **Stateless Calculation:** The `AggregationEngine` holds nothing but its
//!   immutable `EngineSettings`, so `build_report` is deterministic and can be
//!   shared across threads.
//! - **Isolated Failures:** Each operation returns a typed `AnalyticsError`;
//!   `build_report` degrades a failing metric to `MetricValue::Unavailable`
//!   instead of dropping the whole report.
//!
//! ## Public API
//!
//! - `AggregationEngine` / `EngineSettings`: the calculator and its parameters.
//! - `ReportMetrics` / `MetricValue`: the ordered, serializable report.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AggregationEngine, EngineSettings, FIXED_BASKET_DEPTH};
pub use error::AnalyticsError;
pub use report::{MetricValue, ReportMetrics};
