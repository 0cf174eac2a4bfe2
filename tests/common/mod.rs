use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};

pub const TEMP_FILE: &str = "temperature.csv";
pub const STOCK_FILE: &str = "itoen.csv";

/// Write one year of daily temperatures and weekday-only stock quotes into
/// `dir`, where the price tracks the average temperature exactly.
///
/// Returns `(stock_path, temp_path)`.
pub fn write_year(dir: &Path) -> (PathBuf, PathBuf) {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();

    let mut temps = String::new();
    let mut stock = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for offset in 0..365 {
        let date = start + Duration::days(offset);
        let avg = 5.0 + (offset % 90) as f64 * 0.25 + date.month() as f64;
        writeln!(
            temps,
            "{},{avg:.2},8,1,{:.2},8,1,{:.2},8,1",
            date.format("%Y/%m/%d"),
            avg + 4.0,
            avg - 4.0
        )
        .unwrap();

        if date.weekday().number_from_monday() <= 5 {
            writeln!(stock, "{},0,0,0,{:.2},0,100", date.format("%Y-%m-%d"), 3000.0 + avg * 20.0).unwrap();
        }
    }

    let temp_path = dir.join(TEMP_FILE);
    let stock_path = dir.join(STOCK_FILE);
    std::fs::write(&temp_path, temps).unwrap();
    std::fs::write(&stock_path, stock).unwrap();
    (stock_path, temp_path)
}

/// Keep the stock header plus the rows whose date starts with `prefix`.
pub fn keep_stock_rows(stock_path: &Path, prefix: &str) {
    let stock = std::fs::read_to_string(stock_path).unwrap();
    let kept: String = stock
        .lines()
        .enumerate()
        .filter(|(i, line)| *i == 0 || line.starts_with(prefix))
        .map(|(_, line)| format!("{line}\n"))
        .collect();
    std::fs::write(stock_path, kept).unwrap();
}
