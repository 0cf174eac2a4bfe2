//! Seasonal bucketing, correlation, and formatted terminal output.
//!
//! We keep formatting code in `format` so the statistics stay testable without
//! string matching.

use tracing::info;

use crate::domain::{CorrelationResult, JoinedRecord, Season, SeasonalCorrelation};
use crate::error::AppError;
use crate::math::{pearson, round_to};

pub mod format;

pub use format::*;

/// Decimal places kept on every reported coefficient.
pub const COEF_DECIMALS: i32 = 3;

/// Records whose month falls in `season`, in their original order.
pub fn filter_season(records: &[JoinedRecord], season: Season) -> Vec<JoinedRecord> {
    records
        .iter()
        .filter(|r| season.contains_month(r.month()))
        .copied()
        .collect()
}

/// Correlate average, high, and low temperature against the closing price.
pub fn correlate(subset: &[JoinedRecord]) -> Result<CorrelationResult, AppError> {
    let close: Vec<f64> = subset.iter().map(|r| r.close_price).collect();

    let coef = |label: &str, temps: Vec<f64>| -> Result<f64, AppError> {
        pearson(&temps, &close)
            .map(|r| round_to(r, COEF_DECIMALS))
            .map_err(|e| AppError::insufficient_data(format!("Cannot correlate {label} vs. close: {e}")))
    };

    Ok(CorrelationResult {
        avg_coef: coef("average temperature", subset.iter().map(|r| r.avg_temp).collect())?,
        max_coef: coef("high temperature", subset.iter().map(|r| r.max_temp).collect())?,
        min_coef: coef("low temperature", subset.iter().map(|r| r.min_temp).collect())?,
    })
}

/// Filter + correlate for every season in report order.
pub fn seasonal_correlations(records: &[JoinedRecord]) -> Result<Vec<SeasonalCorrelation>, AppError> {
    Season::REPORT_ORDER
        .iter()
        .map(|&season| -> Result<SeasonalCorrelation, AppError> {
            let subset = filter_season(records, season);
            info!(%season, records = subset.len(), "correlating season");

            let result = correlate(&subset)
                .map_err(|e| AppError::insufficient_data(format!("[{season}] {e}")))?;

            Ok(SeasonalCorrelation {
                season,
                records: subset.len(),
                result,
            })
        })
        .collect()
}
