//! Command-line parsing for the temperature / stock-price correlation tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline: `Cli` is converted into a plain `AnalysisConfig` before anything runs.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::domain::{AnalysisConfig, ChartOptions, DEFAULT_CHART_TITLE};

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "corrcoef",
    version,
    about = "Seasonal correlation between daily temperature and a stock's closing price"
)]
pub struct Cli {
    /// Stock-price CSV (header row, date at column 0, close at column 4).
    #[arg(
        long = "stockPath",
        visible_alias = "stock-path",
        env = "CORRCOEF_STOCK_PATH",
        default_value = "./itoen.csv"
    )]
    pub stock_path: PathBuf,

    /// Temperature CSV (no header; date, avg, high, low at columns 0, 1, 4, 7).
    #[arg(
        long = "tempPath",
        visible_alias = "temp-path",
        env = "CORRCOEF_TEMP_PATH",
        default_value = "./temperature.csv"
    )]
    pub temp_path: PathBuf,

    /// Output chart image (`.svg` for SVG, otherwise a bitmap format such as PNG).
    #[arg(
        long = "graphPath",
        visible_alias = "graph-path",
        env = "CORRCOEF_GRAPH_PATH",
        default_value = "./graph.png"
    )]
    pub graph_path: PathBuf,

    /// Chart caption.
    #[arg(long, default_value = DEFAULT_CHART_TITLE)]
    pub title: String,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(200..))]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(150..))]
    pub height: u32,

    /// Export the joined dataset to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the seasonal correlation table to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            stock_path: self.stock_path.clone(),
            temp_path: self.temp_path.clone(),
            graph_path: self.graph_path.clone(),
            chart: ChartOptions {
                title: self.title.clone(),
                width: self.width,
                height: self.height,
            },
            export: self.export.clone(),
            export_summary: self.export_summary.clone(),
        }
    }
}
