//! # Report Writer
//!
//! This crate persists finished reports. It is the system's archive: one
//! JSON file per day, every run appending one document to it.
//!
//! ## Public API
//!
//! - `ReportSink`: the one-method interface the pipeline writes through.
//! - `JsonFileSink`: appends pretty-printed JSON to `report_{dd-mm-yy}.json`.
//! - `read_reports`: parses a report file back into `ReportMetrics`.
//! - `WriterError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod sink;

// Re-export the key components to create a clean, public-facing API.
pub use error::WriterError;
pub use sink::{JsonFileSink, ReportSink, read_reports, report_file_name};
