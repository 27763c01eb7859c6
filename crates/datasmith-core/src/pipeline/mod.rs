//! Pipeline module.
//!
//! This module provides the cleaning orchestrator and the outlier filter it
//! drives.

mod cleaner;
pub mod outliers;

pub use cleaner::{Cleaner, CleaningOutcome, CleaningSummary};
pub use outliers::{OutlierFilter, OutlierOutcome};
