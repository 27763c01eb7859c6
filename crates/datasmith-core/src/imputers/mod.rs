//! Imputation module for handling missing values.
//!
//! This module provides type-driven statistical imputation (mean, mode,
//! forward/back fill).

mod statistical;

pub use statistical::{ImputationOutcome, MissingValueImputer};
