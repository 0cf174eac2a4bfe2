//! Shared analysis pipeline: load -> join -> per-season correlation.
//!
//! Rendering and exports are side effects handled by the caller; this function
//! only computes values, so it can be driven from tests without touching stdout.

use std::path::Path;

use crate::domain::{AnalysisConfig, SeasonalCorrelation};
use crate::error::AppError;
use crate::io::ingest::IngestedData;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub correlations: Vec<SeasonalCorrelation>,
}

/// Execute the analysis for the configured input files.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    run_analysis_paths(&config.stock_path, &config.temp_path)
}

pub fn run_analysis_paths(stock_path: &Path, temp_path: &Path) -> Result<RunOutput, AppError> {
    // 1) Parse both files and join on date.
    let ingest = crate::io::ingest::load(stock_path, temp_path)?;

    // 2) Correlate every season bucket.
    let correlations = crate::report::seasonal_correlations(&ingest.records)?;

    Ok(RunOutput { ingest, correlations })
}
