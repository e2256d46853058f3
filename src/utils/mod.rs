//! Utility functions and helpers.
//!
//! This module contains the size formatting helpers used when printing
//! per-entry progress lines and the final report.

pub mod size;

pub use size::{SizeFormatter, format_human, format_raw};
