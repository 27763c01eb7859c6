//! Outlier handling module.
//!
//! Removes rows whose numeric values fall outside a Tukey fence. Columns are
//! processed one after another and each fence is computed on the rows that
//! survived the previous columns, so column order affects the result.

use crate::error::{DatasmithError, Result};
use crate::types::{ColumnFence, Fence};
use crate::utils::{is_numeric_dtype, numeric_values, quantile_sorted, sort_floats};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Result of an outlier pass over a frame.
#[derive(Debug, Clone)]
pub struct OutlierOutcome {
    pub frame: DataFrame,
    /// Rows removed at each column's step; columns that removed nothing are absent.
    pub removed: BTreeMap<String, usize>,
    /// The fence applied at each step, in processing order.
    pub fences: Vec<ColumnFence>,
}

/// Sequential IQR outlier filter.
pub struct OutlierFilter {
    multiplier: f64,
}

impl OutlierFilter {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Filter every numeric column, left to right.
    pub fn remove_outliers(&self, df: &DataFrame) -> Result<OutlierOutcome> {
        let order: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| is_numeric_dtype(c.dtype()))
            .map(|c| c.name().to_string())
            .collect();
        self.remove_outliers_for(df, &order)
    }

    /// Filter the named columns in the given order.
    pub fn remove_outliers_for(&self, df: &DataFrame, order: &[String]) -> Result<OutlierOutcome> {
        let mut frame = df.clone();
        let mut removed = BTreeMap::new();
        let mut fences = Vec::with_capacity(order.len());

        for name in order {
            let column = frame
                .column(name)
                .map_err(|_| DatasmithError::column_not_found(name))?;
            let series = column.as_materialized_series();
            if !is_numeric_dtype(series.dtype()) {
                return Err(DatasmithError::UnsupportedType {
                    column: name.clone(),
                    dtype: format!("{:?}", series.dtype()),
                    operation: "outlier filtering",
                });
            }

            let mut values = numeric_values(series)?;
            if values.is_empty() {
                debug!("Skipping outlier check for '{}': no values", name);
                continue;
            }
            sort_floats(&mut values);

            let fence = Fence::from_quartiles(
                quantile_sorted(&values, 0.25),
                quantile_sorted(&values, 0.75),
                self.multiplier,
            );

            let float_series = series.cast(&DataType::Float64)?;
            let mask_values: Vec<bool> = float_series
                .f64()?
                .into_iter()
                // nulls and NaN stay
                .map(|v| v.is_none_or(|val| val.is_nan() || fence.contains(val)))
                .collect();

            let rows_entering = frame.height();
            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            frame = frame.filter(&mask)?;
            let rows_removed = rows_entering - frame.height();

            debug!(
                "Column '{}': fence [{:.3}, {:.3}], removed {} of {} rows",
                name, fence.lower, fence.upper, rows_removed, rows_entering
            );

            if rows_removed > 0 {
                removed.insert(name.clone(), rows_removed);
            }
            fences.push(ColumnFence {
                column: name.clone(),
                fence,
                rows_entering,
                rows_removed,
            });
        }

        Ok(OutlierOutcome {
            frame,
            removed,
            fences,
        })
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(1.5)
    }
}
