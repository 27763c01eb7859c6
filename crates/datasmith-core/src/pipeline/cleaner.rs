//! Cleaning orchestrator.
//!
//! Chains type inference, missing-value imputation and outlier removal, and
//! wraps the result in a new dataset linked to its source.

use crate::catalog::DatasetSource;
use crate::config::CleaningConfig;
use crate::dataset::{Dataset, DatasetId};
use crate::error::{DatasmithError, Result, ResultExt};
use crate::imputers::MissingValueImputer;
use crate::pipeline::outliers::OutlierFilter;
use crate::profiler::infer_column_types;
use crate::types::{CleaningReport, ColumnFence};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Everything a cleaning run produced.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// The cleaned dataset; its `source_dataset_id` is the input's id.
    pub dataset: Dataset,
    pub report: CleaningReport,
    pub rows_before: usize,
    pub rows_after: usize,
    pub fences: Vec<ColumnFence>,
    pub duration_ms: u64,
}

impl CleaningOutcome {
    pub fn summary(&self) -> CleaningSummary {
        CleaningSummary {
            source_dataset_id: self.dataset.source_dataset_id(),
            cleaned_dataset_id: self.dataset.id(),
            rows_before: self.rows_before,
            rows_after: self.rows_after,
            values_filled: self.report.total_filled(),
            rows_removed: self.report.total_outliers_removed(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Serializable digest of a cleaning run.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningSummary {
    pub source_dataset_id: Option<DatasetId>,
    pub cleaned_dataset_id: DatasetId,
    pub rows_before: usize,
    pub rows_after: usize,
    pub values_filled: usize,
    pub rows_removed: usize,
    pub duration_ms: u64,
}

/// Runs the full cleaning pipeline for a dataset.
pub struct Cleaner {
    config: CleaningConfig,
}

impl Cleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Clean a dataset.
    ///
    /// Every column is classified before anything is modified, so an
    /// unsupported column fails the run without partial output.
    pub fn clean(&self, dataset: &Dataset) -> Result<CleaningOutcome> {
        let start = Instant::now();
        let df = dataset.frame();

        if df.width() == 0 {
            return Err(DatasmithError::Validation(format!(
                "dataset '{}' has no columns",
                dataset.id()
            )));
        }

        info!(
            "Cleaning dataset {} ({} rows x {} columns)",
            dataset.id(),
            df.height(),
            df.width()
        );

        info!("Step 1: Inferring column types...");
        let types = infer_column_types(df, &self.config).context("Inferring column types")?;

        info!("Step 2: Filling missing values...");
        let imputed = MissingValueImputer::new(self.config.clone())
            .fill_missing_with_types(df, &types)
            .context("Filling missing values")?;

        let outlier_filter = OutlierFilter::new(self.config.iqr_multiplier);
        info!(
            "Step 3: Removing outliers (k = {})...",
            outlier_filter.multiplier()
        );
        let filtered = outlier_filter
            .remove_outliers(&imputed.frame)
            .context("Removing outliers")?;

        let report = CleaningReport {
            missing_values_filled: imputed.filled,
            outliers_removed: filtered.removed,
        };

        let rows_before = df.height();
        let rows_after = filtered.frame.height();
        let cleaned = dataset.derive(filtered.frame);
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Cleaned {} into {}: {} values filled, {} -> {} rows in {}ms",
            dataset.id(),
            cleaned.id(),
            report.total_filled(),
            rows_before,
            rows_after,
            duration_ms
        );

        Ok(CleaningOutcome {
            dataset: cleaned,
            report,
            rows_before,
            rows_after,
            fences: filtered.fences,
            duration_ms,
        })
    }

    /// Look a dataset up through `source` and clean it.
    pub fn clean_by_id(
        &self,
        source: &impl DatasetSource,
        id: DatasetId,
    ) -> Result<CleaningOutcome> {
        let dataset = source.get(id)?;
        self.clean(&dataset)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use polars::prelude::*;

    #[test]
    fn test_clean_mixed_scenario() {
        let df = df![
            "a" => [Some(1i64), None, Some(3)],
            "b" => [Some("x"), Some("x"), None],
        ]
        .unwrap();
        let raw = Dataset::new("mixed", df);

        let outcome = Cleaner::default().clean(&raw).unwrap();
        assert_eq!(outcome.dataset.source_dataset_id(), Some(raw.id()));
        assert_ne!(outcome.dataset.id(), raw.id());
        assert_eq!(outcome.rows_before, 3);
        assert_eq!(outcome.rows_after, 3);

        let json = serde_json::to_value(&outcome.report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "missing_values_filled": {
                    "a": {"filled_values": 1},
                    "b": {"filled_values": 1}
                },
                "outliers_removed": {}
            })
        );
    }

    #[test]
    fn test_clean_removes_outliers_after_filling() {
        let df = df!["col" => [1.0, 2.0, 3.0, 4.0, 100.0]].unwrap();
        let outcome = Cleaner::default().clean(&Dataset::new("o", df)).unwrap();
        assert_eq!(outcome.report.outliers_removed["col"], 1);
        assert_eq!(outcome.rows_after, 4);
        assert_eq!(outcome.summary().rows_removed, 1);
    }

    #[test]
    fn test_clean_rejects_empty_dataset() {
        let err = Cleaner::default()
            .clean(&Dataset::new("empty", DataFrame::empty()))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_clean_fails_whole_run_on_unsupported_column() {
        let inner = Series::new("".into(), &[1i64, 2]);
        let tags = Series::new("tags".into(), &[inner.clone(), inner]);
        let values = Series::new("v".into(), &[Some(1.0), None]);
        let df = DataFrame::new(vec![values.into(), tags.into()]).unwrap();

        let err = Cleaner::default()
            .clean(&Dataset::new("bad", df))
            .unwrap_err();
        assert!(err.is_unsupported_type());
    }

    #[test]
    fn test_clean_by_id_unknown_is_not_found() {
        let catalog = InMemoryCatalog::new();
        let err = Cleaner::default()
            .clean_by_id(&catalog, DatasetId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_clean_by_id_resolves_through_source() {
        let catalog = InMemoryCatalog::new();
        let id = catalog.register(Dataset::new("d", df!["v" => [1.0, 2.0]].unwrap()));
        let outcome = Cleaner::default().clean_by_id(&catalog, id).unwrap();
        assert_eq!(outcome.dataset.source_dataset_id(), Some(id));
    }
}
