//! Dataset Cleaning and Profiling Library
//!
//! Automated cleaning and exploratory profiling of tabular datasets, built on
//! Polars.
//!
//! # Overview
//!
//! - **Ingestion**: CSV with a sniffed separator and spreadsheet workbooks
//! - **Type Inference**: Classifies each column as numeric, categorical,
//!   datetime, email, text or unknown from a sample of its values
//! - **Missing Values**: Fills nulls with the mean, mode or neighbouring
//!   timestamps depending on the inferred type
//! - **Outliers**: Removes rows outside per-column Tukey fences, column by
//!   column
//! - **Profiling**: Numeric summaries, correlations, grouped category means,
//!   extremes and an overview of notable columns
//! - **Lineage**: Cleaning never mutates its input; the cleaned dataset
//!   records the id it was derived from
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datasmith_core::{Cleaner, CleaningConfig, DataProfiler, InMemoryCatalog, io};
//!
//! let catalog = InMemoryCatalog::new();
//! let raw_id = catalog.register(io::load_table("sales.csv")?);
//!
//! let config = CleaningConfig::builder().iqr_multiplier(3.0).build()?;
//! let outcome = Cleaner::new(config.clone()).clean_by_id(&catalog, raw_id)?;
//! println!("{}", serde_json::to_string_pretty(&outcome.report)?);
//!
//! let cleaned_id = catalog.register_derived(outcome.dataset)?;
//! let best = catalog.resolve_best(raw_id)?;
//! assert_eq!(best.id(), cleaned_id);
//!
//! let profile = DataProfiler::new(config).profile(&best)?;
//! println!("{:?}", profile.overview.strong_correlations);
//! ```

pub mod catalog;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod sql;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use catalog::{DatasetSource, InMemoryCatalog};
pub use charts::recommend_chart_types;
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError, StorageConfig};
pub use dataset::{Dataset, DatasetId, DatasetSummary};
pub use error::{DatasmithError, Result, ResultExt};
pub use imputers::{ImputationOutcome, MissingValueImputer};
pub use pipeline::{Cleaner, CleaningOutcome, CleaningSummary, OutlierFilter, OutlierOutcome};
pub use profiler::{DataProfiler, infer_column_types, infer_semantic_type};
pub use sql::validate_select_sql;
pub use types::{
    CleaningReport, ColumnFence, ColumnProfile, CorrelationMatrix, DatasetProfile, Extremes,
    Fence, FilledValues, NumericSummary, ProfileOverview, SemanticType, StrongCorrelation,
};
