//! Mathematical utilities: Pearson correlation and rounding.

pub mod correlation;

pub use correlation::*;
