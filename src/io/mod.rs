//! Input/output helpers.
//!
//! - CSV ingest + date join (`ingest`)
//! - optional exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
