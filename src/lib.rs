//! `seasonal-corr` library crate.
//!
//! The binary (`corrcoef`) is a thin wrapper around this library so that the
//! ingest, statistics, and chart code stay testable without spawning processes.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
