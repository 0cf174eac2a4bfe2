//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - joined daily observations (`JoinedRecord`)
//! - season buckets (`Season`)
//! - correlation outputs (`CorrelationResult`, `SeasonalCorrelation`)
//! - the resolved run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
