//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Semantic type inference for columns
//! - Per-column statistics and numeric summaries
//! - Pearson correlations between numeric columns
//! - Grouped category insights and extremes
//!
//! Profiling never modifies its input and never fails on an empty frame.

mod insights;
mod statistics;
pub mod type_inference;

use crate::config::CleaningConfig;
use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::types::{ColumnProfile, DatasetProfile, SemanticType};
use crate::utils::{distinct_count, numeric_values, optional_numeric_values, optional_string_values};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub use type_inference::{infer_column_types, infer_semantic_type, is_email, parses_as_datetime};

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler {
    config: CleaningConfig,
}

impl DataProfiler {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Profile an entire dataset.
    pub fn profile(&self, dataset: &Dataset) -> Result<DatasetProfile> {
        let df = dataset.frame();
        info!(
            "Profiling dataset {} ({} rows x {} columns)",
            dataset.id(),
            df.height(),
            df.width()
        );

        let decimals = self.config.round_decimals;
        let mut columns = Vec::with_capacity(df.width());
        let mut numeric_summary = BTreeMap::new();
        let mut extremes = BTreeMap::new();
        let mut numeric_rows: Vec<(String, Vec<Option<f64>>)> = Vec::new();
        let mut category_rows: Vec<(String, Vec<Option<String>>)> = Vec::new();

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let name = series.name().to_string();
            let profile = self
                .profile_column(series, df.height())
                .context(format!("Profiling column '{name}'"))?;

            match profile.semantic_type {
                SemanticType::Numeric => {
                    let values = numeric_values(series)?;
                    if !values.is_empty() {
                        extremes.insert(
                            name.clone(),
                            insights::extremes(&values, self.config.extremes_count, decimals),
                        );
                    }
                    if let Some(summary) = &profile.numeric {
                        numeric_summary.insert(name.clone(), summary.clone());
                    }
                    numeric_rows.push((name.clone(), optional_numeric_values(series)?));
                }
                SemanticType::Categorical | SemanticType::Text
                    if profile.distinct_count <= self.config.insight_max_distinct =>
                {
                    category_rows.push((name.clone(), optional_string_values(series)?));
                }
                SemanticType::Categorical | SemanticType::Text => {
                    debug!(
                        "Skipping category insights for '{}' ({} distinct values)",
                        name, profile.distinct_count
                    );
                }
                _ => {}
            }

            columns.push(profile);
        }

        let correlations = statistics::correlation_matrix(&numeric_rows, decimals);
        let category_insights = insights::category_insights(&category_rows, &numeric_rows, decimals);
        let overview = insights::overview(&columns, correlations.as_ref(), &self.config);

        debug!(
            "Profile complete: {} numeric, {} categorical-insight columns",
            numeric_rows.len(),
            category_rows.len()
        );

        Ok(DatasetProfile {
            dataset_id: dataset.id(),
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            numeric_summary,
            correlations,
            category_insights,
            extremes,
            overview,
        })
    }

    fn profile_column(&self, series: &Series, total_rows: usize) -> Result<ColumnProfile> {
        let semantic_type = infer_semantic_type(series, &self.config)?;
        let missing_count = series.null_count();
        let missing_fraction = if total_rows > 0 {
            missing_count as f64 / total_rows as f64
        } else {
            0.0
        };

        let numeric = if semantic_type == SemanticType::Numeric {
            statistics::summarize_numeric(&numeric_values(series)?)
        } else {
            None
        };

        Ok(ColumnProfile {
            name: series.name().to_string(),
            dtype: format!("{:?}", series.dtype()),
            semantic_type,
            missing_count,
            missing_fraction,
            distinct_count: distinct_count(series)?,
            numeric,
        })
    }
}

impl Default for DataProfiler {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_of(df: DataFrame) -> DatasetProfile {
        DataProfiler::default()
            .profile(&Dataset::new("test", df))
            .unwrap()
    }

    #[test]
    fn test_profile_column_metadata() {
        let df = df![
            "age" => [Some(20i64), None, Some(40), Some(30)],
            "city" => [Some("Oslo"), Some("Rome"), None, Some("Oslo")],
        ]
        .unwrap();

        let profile = profile_of(df);
        assert_eq!(profile.num_rows, 4);
        assert_eq!(profile.num_columns, 2);

        let age = profile.column("age").unwrap();
        assert_eq!(age.semantic_type, SemanticType::Numeric);
        assert_eq!(age.missing_count, 1);
        assert_eq!(age.missing_fraction, 0.25);
        assert_eq!(age.distinct_count, 3);
        assert_eq!(age.numeric.as_ref().unwrap().mean, 30.0);

        let city = profile.column("city").unwrap();
        assert_eq!(city.semantic_type, SemanticType::Categorical);
        assert_eq!(city.distinct_count, 2);
        assert!(city.numeric.is_none());
    }

    #[test]
    fn test_profile_numeric_summary_omits_all_null_column() {
        let df = df![
            "x" => [1.0, 2.0, 3.0],
            "empty" => [None::<f64>, None, None],
        ]
        .unwrap();

        let profile = profile_of(df);
        assert!(profile.numeric_summary.contains_key("x"));
        assert!(!profile.numeric_summary.contains_key("empty"));
        assert_eq!(
            profile.column("empty").unwrap().semantic_type,
            SemanticType::Unknown
        );
    }

    #[test]
    fn test_profile_constant_column_correlation_is_zero() {
        let df = df![
            "x" => [1.0, 2.0, 3.0, 4.0],
            "same" => [7.0, 7.0, 7.0, 7.0],
        ]
        .unwrap();

        let profile = profile_of(df);
        let corr = profile.correlations.unwrap();
        assert_eq!(corr.columns(), ["x", "same"]);
        assert_eq!(corr.get("x", "same"), Some(0.0));
        assert_eq!(corr.get("same", "same"), Some(1.0));
    }

    #[test]
    fn test_profile_single_numeric_column_has_no_correlations() {
        let df = df!["x" => [1.0, 2.0, 3.0], "label" => ["a", "b", "a"]].unwrap();
        let profile = profile_of(df);
        assert!(profile.correlations.is_none());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("correlations").is_none());
    }

    #[test]
    fn test_profile_category_insights_and_extremes() {
        let df = df![
            "team" => ["red", "blue", "red", "blue"],
            "score" => [10.0, 1.0, 20.0, 3.0],
        ]
        .unwrap();

        let profile = profile_of(df);
        let team = &profile.category_insights["team"]["score"];
        assert_eq!(team["red"], 15.0);
        assert_eq!(team["blue"], 2.0);

        let score = &profile.extremes["score"];
        assert_eq!(score.top_5, vec![20.0, 10.0, 3.0, 1.0]);
        assert_eq!(score.bottom_5, vec![1.0, 3.0, 10.0, 20.0]);
    }

    #[test]
    fn test_profile_insights_skip_email_and_date_columns() {
        let df = df![
            "contact" => ["a@x.io", "b@x.io", "a@x.io", "b@x.io"],
            "day" => ["2024-01-01", "2024-01-02", "2024-01-01", "2024-01-02"],
            "team" => ["red", "blue", "red", "blue"],
            "score" => [10.0, 1.0, 20.0, 3.0],
        ]
        .unwrap();

        let profile = profile_of(df);
        assert_eq!(
            profile.category_insights.keys().collect::<Vec<_>>(),
            vec!["team"]
        );
    }

    #[test]
    fn test_profile_skips_high_cardinality_categories() {
        let labels: Vec<String> = (0..30).map(|i| format!("id-{i}")).collect();
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let df = df!["label" => labels, "v" => values].unwrap();

        let profile = profile_of(df);
        assert!(profile.category_insights.is_empty());
    }

    #[test]
    fn test_profile_zero_rows_is_not_an_error() {
        let df = df![
            "x" => Vec::<f64>::new(),
            "y" => Vec::<f64>::new(),
            "s" => Vec::<String>::new(),
        ]
        .unwrap();

        let profile = profile_of(df);
        assert_eq!(profile.num_rows, 0);
        assert!(profile.numeric_summary.is_empty());
        assert!(profile.extremes.is_empty());
        assert!(profile.category_insights.is_empty());
        for column in &profile.columns {
            assert_eq!(column.missing_fraction, 0.0);
        }
    }

    #[test]
    fn test_profile_overview_lists() {
        let df = df![
            "a" => [Some(1.0), Some(2.0), None, Some(4.0)],
            "b" => [2.0, 4.0, 6.0, 8.0],
            "kind" => ["x", "y", "x", "y"],
        ]
        .unwrap();

        let profile = profile_of(df);
        let overview = &profile.overview;
        assert_eq!(overview.numeric_columns, vec!["a", "b"]);
        assert_eq!(overview.categorical_columns, vec!["kind"]);
        assert_eq!(overview.missing_summary["a"], 0.25);
        assert_eq!(overview.strong_correlations.len(), 1);
        assert_eq!(overview.strong_correlations[0].correlation, 1.0);
    }
}
