//! CSV ingest and date-keyed join.
//!
//! Two fixed-layout inputs are read:
//!
//! - temperature CSV, no header: `date(YYYY/MM/DD)` at column 0, average /
//!   high / low temperature at columns 1 / 4 / 7
//! - stock CSV, one header row: `date(YYYY-MM-DD)` at column 0, close at column 4
//!
//! Column positions are positional on purpose: the temperature export carries
//! no usable header, so there is nothing to discover columns from.
//!
//! Every parse failure is fatal. A temperature day with no stock quote is
//! dropped silently (markets are closed on weekends and holidays).

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::JoinedRecord;
use crate::error::AppError;

const TEMP_DATE_FMT: &str = "%Y/%m/%d";
const STOCK_DATE_FMT: &str = "%Y-%m-%d";

const TEMP_COL_DATE: usize = 0;
const TEMP_COL_AVG: usize = 1;
const TEMP_COL_MAX: usize = 4;
const TEMP_COL_MIN: usize = 7;

const STOCK_COL_DATE: usize = 0;
const STOCK_COL_CLOSE: usize = 4;

/// One parsed temperature row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRow {
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
}

/// Ingest output: joined records + row counts for diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedData {
    /// Ordered like the temperature file, restricted to dates with a stock quote.
    pub records: Vec<JoinedRecord>,
    pub temp_rows: usize,
    pub stock_rows: usize,
}

impl IngestedData {
    /// Temperature rows dropped for lack of a same-day stock quote.
    pub fn unmatched(&self) -> usize {
        self.temp_rows - self.records.len()
    }
}

/// Read both files and inner-join them on calendar date.
pub fn load(stock_path: &Path, temp_path: &Path) -> Result<IngestedData, AppError> {
    info!("Get Data...");

    let temps = read_temperature_rows(temp_path)?;
    let stock = read_stock_rows(stock_path)?;
    let index = index_by_date(&stock);

    let records = join(&temps, &index);

    let data = IngestedData {
        records,
        temp_rows: temps.len(),
        stock_rows: stock.len(),
    };

    info!(
        temp_rows = data.temp_rows,
        stock_rows = data.stock_rows,
        joined = data.records.len(),
        "loaded input files"
    );
    if data.unmatched() > 0 {
        debug!(
            unmatched = data.unmatched(),
            "temperature rows without a stock quote were dropped"
        );
    }

    Ok(data)
}

/// Parse the header-less temperature CSV.
pub fn read_temperature_rows(path: &Path) -> Result<Vec<TemperatureRow>, AppError> {
    let mut reader = open_csv(path, false)?;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = line_of(&record);

        let date = parse_date(field(&record, TEMP_COL_DATE, path, line)?, TEMP_DATE_FMT, path, line)?;
        let avg_temp = parse_f64(field(&record, TEMP_COL_AVG, path, line)?, TEMP_COL_AVG, path, line)?;
        let max_temp = parse_f64(field(&record, TEMP_COL_MAX, path, line)?, TEMP_COL_MAX, path, line)?;
        let min_temp = parse_f64(field(&record, TEMP_COL_MIN, path, line)?, TEMP_COL_MIN, path, line)?;

        rows.push(TemperatureRow {
            date,
            avg_temp,
            max_temp,
            min_temp,
        });
    }

    Ok(rows)
}

/// Parse the stock CSV (header row skipped) into `(date, close)` in file order.
pub fn read_stock_rows(path: &Path) -> Result<Vec<(NaiveDate, f64)>, AppError> {
    let mut reader = open_csv(path, true)?;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = line_of(&record);

        let date = parse_date(field(&record, STOCK_COL_DATE, path, line)?, STOCK_DATE_FMT, path, line)?;
        let close = parse_f64(field(&record, STOCK_COL_CLOSE, path, line)?, STOCK_COL_CLOSE, path, line)?;

        rows.push((date, close));
    }

    Ok(rows)
}

/// Map date -> close. On duplicate dates the first row in file order wins.
pub fn index_by_date(stock: &[(NaiveDate, f64)]) -> HashMap<NaiveDate, f64> {
    let mut index = HashMap::with_capacity(stock.len());
    for &(date, close) in stock {
        match index.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(close);
            }
            Entry::Occupied(_) => {
                debug!(%date, close, "duplicate stock date ignored (first row wins)");
            }
        }
    }
    index
}

/// Inner join, preserving temperature-file order.
pub fn join(temps: &[TemperatureRow], index: &HashMap<NaiveDate, f64>) -> Vec<JoinedRecord> {
    temps
        .iter()
        .filter_map(|t| {
            index.get(&t.date).map(|&close_price| JoinedRecord {
                date: t.date,
                avg_temp: t.avg_temp,
                max_temp: t.max_temp,
                min_temp: t.min_temp,
                close_price,
            })
        })
        .collect()
}

fn open_csv(path: &Path, has_headers: bool) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn csv_error(path: &Path, e: csv::Error) -> AppError {
    if e.is_io_error() {
        AppError::io(format!("Failed to read CSV '{}': {e}", path.display()))
    } else {
        AppError::parse(format!("Malformed CSV '{}': {e}", path.display()))
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'a>(record: &'a StringRecord, idx: usize, path: &Path, line: u64) -> Result<&'a str, AppError> {
    let value = record.get(idx).ok_or_else(|| {
        AppError::parse(format!(
            "{}:{line}: expected at least {} columns, found {}",
            path.display(),
            idx + 1,
            record.len()
        ))
    })?;

    // Spreadsheet exports sometimes prefix the first cell with a UTF-8 BOM.
    Ok(if idx == 0 { value.trim_start_matches('\u{feff}') } else { value })
}

fn parse_date(s: &str, fmt: &str, path: &Path, line: u64) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, fmt).map_err(|e| {
        AppError::parse(format!(
            "{}:{line}: invalid date '{s}' (expected {fmt}): {e}",
            path.display()
        ))
    })
}

fn parse_f64(s: &str, column: usize, path: &Path, line: u64) -> Result<f64, AppError> {
    let v = s.parse::<f64>().map_err(|_| {
        AppError::parse(format!(
            "{}:{line}: column {column}: '{s}' is not a number",
            path.display()
        ))
    })?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AppError::parse(format!(
            "{}:{line}: column {column}: non-finite value '{s}'",
            path.display()
        )))
    }
}
