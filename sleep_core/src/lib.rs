#![forbid(unsafe_code)]

//! Core scoring and analytics for the sleepq sleep tracker.
//!
//! This crate provides:
//! - Domain types (entries, records, aggregates, advisories)
//! - The versioned sleep-quality estimator
//! - Trend aggregation and chart layout data
//! - Rule-based suggestions
//! - Persistence (append-only CSV store) and ingestion

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod estimator;
pub mod aggregate;
pub mod suggest;
pub mod ingest;
pub mod store;
pub mod chart;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use estimator::{estimate, estimate_entry, EstimatorVersion};
pub use aggregate::aggregate;
pub use suggest::{suggest, suggest_with, SuggestionThresholds};
pub use ingest::record_entry;
pub use store::{CsvRecordStore, RecordStore};
pub use chart::{build_chart, ChartSpec, Panel};
pub use report::{build_report, Report, ReportOutcome};
