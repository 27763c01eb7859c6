//! Configuration types for the cleaning and profiling pipeline.
//!
//! Everything tunable lives in [`CleaningConfig`], which is passed explicitly
//! to each component. Storage locations are part of the configuration too;
//! there are no process-wide default directories.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where datasets and reports are written by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory. Relative sub-directories are resolved against it.
    pub root: PathBuf,
    pub cleaned_dir: PathBuf,
    pub reports_dir: PathBuf,
}

impl StorageConfig {
    /// Storage layout rooted at `root` with the conventional sub-directories.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cleaned_dir: PathBuf::from("cleaned"),
            reports_dir: PathBuf::from("reports"),
        }
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.resolve(&self.cleaned_dir)
    }

    pub fn reports_path(&self) -> PathBuf {
        self.resolve(&self.reports_dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::rooted_at("storage")
    }
}

/// Configuration for cleaning and profiling.
///
/// Use [`CleaningConfig::builder()`] to create a configuration with the
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use datasmith_core::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .iqr_multiplier(3.0)
///     .category_max_distinct(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Multiplier applied to the IQR when building a Tukey fence.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Non-numeric columns with at most this many distinct values are
    /// categorical; above it they are free text.
    /// Default: 20
    pub category_max_distinct: usize,

    /// Categorical columns with more distinct values than this are skipped
    /// when computing grouped category insights.
    /// Default: 25
    pub insight_max_distinct: usize,

    /// How many largest/smallest values to report per numeric column.
    /// Default: 5
    pub extremes_count: usize,

    /// Number of leading non-null values inspected by type inference.
    /// Default: 10
    pub inference_sample_size: usize,

    /// Decimal places used for correlations, insights and extremes.
    /// Default: 3
    pub round_decimals: u32,

    /// Fill value for string columns that have no mode.
    /// Default: "Unknown"
    pub unknown_placeholder: String,

    /// Absolute Pearson coefficient above which a pair is reported as strong.
    /// Default: 0.8
    pub strong_correlation_threshold: f64,

    /// Distinct count above which a column is flagged as high cardinality.
    /// Default: 50
    pub high_cardinality_threshold: usize,

    /// Storage layout used by the CLI and IO helpers.
    pub storage: StorageConfig,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            category_max_distinct: 20,
            insight_max_distinct: 25,
            extremes_count: 5,
            inference_sample_size: 10,
            round_decimals: 3,
            unknown_placeholder: "Unknown".to_string(),
            strong_correlation_threshold: 0.8,
            high_cardinality_threshold: 50,
            storage: StorageConfig::default(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(
                self.iqr_multiplier,
            ));
        }

        if !(0.0..=1.0).contains(&self.strong_correlation_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "strong_correlation_threshold".to_string(),
                value: self.strong_correlation_threshold,
            });
        }

        if self.inference_sample_size == 0 {
            return Err(ConfigValidationError::ZeroSampleSize);
        }

        if self.round_decimals > 15 {
            return Err(ConfigValidationError::InvalidPrecision(self.round_decimals));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a finite, non-negative number)")]
    InvalidMultiplier(f64),

    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Inference sample size must be at least 1")]
    ZeroSampleSize,

    #[error("Invalid rounding precision: {0} decimals (at most 15)")]
    InvalidPrecision(u32),
}

impl From<ConfigValidationError> for crate::error::DatasmithError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::DatasmithError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    iqr_multiplier: Option<f64>,
    category_max_distinct: Option<usize>,
    insight_max_distinct: Option<usize>,
    extremes_count: Option<usize>,
    inference_sample_size: Option<usize>,
    round_decimals: Option<u32>,
    unknown_placeholder: Option<String>,
    strong_correlation_threshold: Option<f64>,
    high_cardinality_threshold: Option<usize>,
    storage: Option<StorageConfig>,
}

impl CleaningConfigBuilder {
    /// Set the Tukey fence multiplier.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the distinct-count ceiling for categorical columns.
    pub fn category_max_distinct(mut self, n: usize) -> Self {
        self.category_max_distinct = Some(n);
        self
    }

    /// Set the distinct-count ceiling for grouped category insights.
    pub fn insight_max_distinct(mut self, n: usize) -> Self {
        self.insight_max_distinct = Some(n);
        self
    }

    pub fn extremes_count(mut self, n: usize) -> Self {
        self.extremes_count = Some(n);
        self
    }

    /// Set how many non-null values type inference looks at.
    pub fn inference_sample_size(mut self, n: usize) -> Self {
        self.inference_sample_size = Some(n);
        self
    }

    pub fn round_decimals(mut self, decimals: u32) -> Self {
        self.round_decimals = Some(decimals);
        self
    }

    /// Set the fill value used when a string column has no mode.
    pub fn unknown_placeholder(mut self, value: impl Into<String>) -> Self {
        self.unknown_placeholder = Some(value.into());
        self
    }

    pub fn strong_correlation_threshold(mut self, threshold: f64) -> Self {
        self.strong_correlation_threshold = Some(threshold);
        self
    }

    pub fn high_cardinality_threshold(mut self, n: usize) -> Self {
        self.high_cardinality_threshold = Some(n);
        self
    }

    /// Set the storage layout.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Root all storage directories under `root`.
    pub fn storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage = Some(StorageConfig::rooted_at(root));
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            category_max_distinct: self
                .category_max_distinct
                .unwrap_or(defaults.category_max_distinct),
            insight_max_distinct: self
                .insight_max_distinct
                .unwrap_or(defaults.insight_max_distinct),
            extremes_count: self.extremes_count.unwrap_or(defaults.extremes_count),
            inference_sample_size: self
                .inference_sample_size
                .unwrap_or(defaults.inference_sample_size),
            round_decimals: self.round_decimals.unwrap_or(defaults.round_decimals),
            unknown_placeholder: self
                .unknown_placeholder
                .unwrap_or(defaults.unknown_placeholder),
            strong_correlation_threshold: self
                .strong_correlation_threshold
                .unwrap_or(defaults.strong_correlation_threshold),
            high_cardinality_threshold: self
                .high_cardinality_threshold
                .unwrap_or(defaults.high_cardinality_threshold),
            storage: self.storage.unwrap_or(defaults.storage),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.category_max_distinct, 20);
        assert_eq!(config.insight_max_distinct, 25);
        assert_eq!(config.extremes_count, 5);
        assert_eq!(config.round_decimals, 3);
        assert_eq!(config.unknown_placeholder, "Unknown");
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .iqr_multiplier(3.0)
            .category_max_distinct(5)
            .extremes_count(3)
            .unknown_placeholder("n/a")
            .build()
            .unwrap();

        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.category_max_distinct, 5);
        assert_eq!(config.extremes_count, 3);
        assert_eq!(config.unknown_placeholder, "n/a");
        // untouched fields keep their defaults
        assert_eq!(config.insight_max_distinct, 25);
    }

    #[test]
    fn test_validation_negative_multiplier() {
        let result = CleaningConfig::builder().iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier(_)
        ));
    }

    #[test]
    fn test_validation_zero_sample_size() {
        let result = CleaningConfig::builder().inference_sample_size(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroSampleSize
        ));
    }

    #[test]
    fn test_validation_correlation_threshold() {
        let result = CleaningConfig::builder()
            .strong_correlation_threshold(1.5)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_storage_paths_resolve_against_root() {
        let storage = StorageConfig::rooted_at("/data/datasmith");
        assert_eq!(
            storage.cleaned_path(),
            PathBuf::from("/data/datasmith/cleaned")
        );
        assert_eq!(
            storage.reports_path(),
            PathBuf::from("/data/datasmith/reports")
        );
    }

    #[test]
    fn test_builder_storage_root() {
        let config = CleaningConfig::builder()
            .storage_root("/tmp/ds")
            .build()
            .unwrap();
        assert_eq!(config.storage, StorageConfig::rooted_at("/tmp/ds"));
        assert_eq!(config.storage.reports_path(), PathBuf::from("/tmp/ds/reports"));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "iqr_multiplier": 2.0,
            "category_max_distinct": 12,
            "insight_max_distinct": 30,
            "extremes_count": 4,
            "inference_sample_size": 25,
            "round_decimals": 2,
            "unknown_placeholder": "Missing",
            "strong_correlation_threshold": 0.9,
            "high_cardinality_threshold": 100,
            "storage": {
                "root": "/srv/data",
                "cleaned_dir": "clean",
                "reports_dir": "reports"
            }
        }"#;

        let config: CleaningConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.unknown_placeholder, "Missing");
        assert_eq!(config.storage.cleaned_path(), PathBuf::from("/srv/data/clean"));
        assert!(config.validate().is_ok());
    }
}
