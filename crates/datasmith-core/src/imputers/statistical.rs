//! Statistical imputation driven by semantic column types.
//!
//! Numeric columns take the mean, datetime columns are forward then back
//! filled, string-like columns take the mode and boolean columns take the
//! boolean mode.

use crate::config::CleaningConfig;
use crate::error::{DatasmithError, Result, ResultExt};
use crate::profiler::infer_column_types;
use crate::types::{FilledValues, SemanticType};
use crate::utils::{
    bool_mode, fill_bool_nulls, fill_numeric_nulls, fill_string_nulls, is_string_dtype,
    numeric_values, string_mode,
};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of a missing-value pass over a frame.
#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    pub frame: DataFrame,
    /// Columns that had nulls replaced, keyed by name.
    pub filled: BTreeMap<String, FilledValues>,
}

/// Fills missing values column by column.
pub struct MissingValueImputer {
    config: CleaningConfig,
}

impl MissingValueImputer {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Infer column types, then fill every column that has nulls.
    pub fn fill_missing(&self, df: &DataFrame) -> Result<ImputationOutcome> {
        let types = infer_column_types(df, &self.config)?;
        self.fill_missing_with_types(df, &types)
    }

    /// Fill nulls using already inferred semantic types.
    ///
    /// The input frame is never modified; the returned frame is a copy with
    /// the filled columns swapped in.
    pub fn fill_missing_with_types(
        &self,
        df: &DataFrame,
        types: &[(String, SemanticType)],
    ) -> Result<ImputationOutcome> {
        let mut frame = df.clone();
        let mut filled = BTreeMap::new();

        for (name, semantic) in types {
            let column = df
                .column(name)
                .map_err(|_| DatasmithError::column_not_found(name))?;
            let series = column.as_materialized_series();
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }

            let replacement = self
                .impute_column(series, *semantic)
                .context(format!("Imputing column '{name}'"))?;

            if let Some(replacement) = replacement {
                frame.replace(name, replacement)?;
                filled.insert(
                    name.clone(),
                    FilledValues {
                        filled_values: missing,
                    },
                );
            }
        }

        Ok(ImputationOutcome { frame, filled })
    }

    /// Compute the filled version of one column, or `None` when no fill value
    /// can be derived.
    fn impute_column(&self, series: &Series, semantic: SemanticType) -> Result<Option<Series>> {
        let name = series.name().as_str();

        if series.dtype() == &DataType::Boolean {
            return Ok(match bool_mode(series)? {
                Some(mode) => {
                    debug!("Filling '{}' with boolean mode {}", name, mode);
                    Some(fill_bool_nulls(series, mode)?)
                }
                None => {
                    warn!("Boolean column '{}' has no values; leaving it unfilled", name);
                    None
                }
            });
        }

        match semantic {
            SemanticType::Numeric => {
                let values = numeric_values(series)?;
                let Some(mean) = Series::new(series.name().clone(), values).mean() else {
                    warn!("Numeric column '{}' has no values; leaving it unfilled", name);
                    return Ok(None);
                };
                debug!("Filling '{}' with mean {:.3}", name, mean);
                Ok(Some(fill_numeric_nulls(series, mean)?))
            }
            SemanticType::Datetime => {
                debug!("Forward/back filling '{}'", name);
                let filled = series.fill_null(FillNullStrategy::Forward(None))?;
                Ok(Some(filled.fill_null(FillNullStrategy::Backward(None))?))
            }
            SemanticType::Categorical | SemanticType::Email | SemanticType::Text => {
                let value = match string_mode(series)? {
                    Some(mode) => mode,
                    None => self.config.unknown_placeholder.clone(),
                };
                debug!("Filling '{}' with '{}'", name, value);
                Ok(Some(fill_string_nulls(series, &value)?))
            }
            SemanticType::Unknown => {
                let dtype = series.dtype();
                if is_string_dtype(dtype) || dtype == &DataType::Null {
                    debug!(
                        "Filling empty column '{}' with '{}'",
                        name, self.config.unknown_placeholder
                    );
                    Ok(Some(fill_string_nulls(
                        series,
                        &self.config.unknown_placeholder,
                    )?))
                } else {
                    warn!(
                        "Column '{}' ({:?}) has no values; leaving it unfilled",
                        name, dtype
                    );
                    Ok(None)
                }
            }
        }
    }
}

impl Default for MissingValueImputer {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}
