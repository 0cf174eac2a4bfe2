//! Shared domain types.
//!
//! These types are intentionally kept small and immutable: every pipeline
//! stage consumes the previous stage's values and produces new ones.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar day observed in both the temperature and the stock file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub close_price: f64,
}

impl JoinedRecord {
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Calendar-month bucket used to partition joined records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Season {
    All,
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Report order.
    pub const REPORT_ORDER: [Season; 5] = [
        Season::All,
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Season::All => "ALL",
            Season::Spring => "SPRING",
            Season::Summer => "SUMMER",
            Season::Autumn => "AUTUMN",
            Season::Winter => "WINTER",
        }
    }

    /// `(start, end)` months, both inclusive.
    ///
    /// Winter is `(12, 2)` and wraps the year boundary; see [`Season::contains_month`].
    pub fn month_range(self) -> (u32, u32) {
        match self {
            Season::All => (1, 12),
            Season::Spring => (3, 5),
            Season::Summer => (6, 8),
            Season::Autumn => (9, 11),
            Season::Winter => (12, 2),
        }
    }

    pub fn contains_month(self, month: u32) -> bool {
        let (start, end) = self.month_range();
        match self {
            // December, or January through February.
            Season::Winter => month == start || (0 < month && month <= end),
            _ => start <= month && month <= end,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pearson coefficients of each temperature series against the closing price,
/// rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    #[serde(rename = "avg")]
    pub avg_coef: f64,
    #[serde(rename = "max")]
    pub max_coef: f64,
    #[serde(rename = "min")]
    pub min_coef: f64,
}

/// A season's correlation together with the subset size it was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalCorrelation {
    pub season: Season,
    pub records: usize,
    #[serde(flatten)]
    pub result: CorrelationResult,
}

/// Fully resolved run configuration (after CLI/env/default resolution).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub stock_path: PathBuf,
    pub temp_path: PathBuf,
    pub graph_path: PathBuf,
    pub chart: ChartOptions,
    pub export: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

/// Cosmetic chart settings.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_CHART_TITLE.to_string(),
            width: 800,
            height: 600,
        }
    }
}

pub const DEFAULT_CHART_TITLE: &str = "Itoen(2593)StockPrice vs. Temperature";
