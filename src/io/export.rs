//! Optional exports of the joined dataset and the seasonal correlation table.
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::domain::{JoinedRecord, SeasonalCorrelation};
use crate::error::AppError;

/// Write joined records to CSV (`date,avg_temp,max_temp,min_temp,close_price`).
pub fn write_joined_csv(path: &Path, records: &[JoinedRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV '{}': {e}", path.display())))?;

    info!(path = %path.display(), rows = records.len(), "wrote joined dataset");
    Ok(())
}

/// Write the per-season correlation table as pretty JSON.
pub fn write_summary_json(path: &Path, rows: &[SeasonalCorrelation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, rows)
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;

    info!(path = %path.display(), "wrote correlation summary");
    Ok(())
}
