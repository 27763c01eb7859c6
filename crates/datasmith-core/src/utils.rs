//! Shared utilities for the cleaning and profiling pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Check if a DataType holds text values.
#[inline]
pub fn is_string_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

/// Storage types the pipeline knows how to classify and impute.
pub fn is_supported_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype)
        || is_datetime_dtype(dtype)
        || is_string_dtype(dtype)
        || matches!(dtype, DataType::Boolean | DataType::Null)
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Non-null, non-NaN values of a numeric Series as `f64`, in row order.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Row-aligned values of a numeric Series as `Option<f64>`; NaN maps to `None`.
pub fn optional_numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Row-aligned string rendering of a Series, nulls preserved.
pub fn optional_string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// The first `max_samples` non-null values rendered as strings.
pub fn leading_string_samples(series: &Series, max_samples: usize) -> PolarsResult<Vec<String>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(Vec::new());
    }

    let casted = non_null.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .flatten()
        .take(max_samples)
        .map(str::to_string)
        .collect())
}

/// Number of distinct non-null values.
pub fn distinct_count(series: &Series) -> PolarsResult<usize> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(0);
    }
    non_null.n_unique()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Quantile of an ascending-sorted slice using linear interpolation between
/// the closest ranks.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

/// Sort a slice of floats ascending.
pub fn sort_floats(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Most frequent non-null string value of a Series.
///
/// Ties go to the lexicographically smallest value so the result does not
/// depend on hash iteration order.
pub fn string_mode(series: &Series) -> PolarsResult<Option<String>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }

    let casted = non_null.cast(&DataType::String)?;
    let mut value_counts: HashMap<&str, usize> = HashMap::new();
    for val in casted.str()?.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    Ok(value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val.to_string()))
}

/// Most frequent non-null boolean value; ties go to `false`.
pub fn bool_mode(series: &Series) -> PolarsResult<Option<bool>> {
    let ca = series.bool()?;
    let (mut trues, mut falses) = (0usize, 0usize);
    for v in ca.into_iter().flatten() {
        if v {
            trues += 1;
        } else {
            falses += 1;
        }
    }
    Ok(match (trues, falses) {
        (0, 0) => None,
        (t, f) => Some(t > f),
    })
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::String)?;
    let values: Vec<&str> = casted
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a boolean Series with a specific value.
pub fn fill_bool_nulls(series: &Series, fill_value: bool) -> PolarsResult<Series> {
    let values: Vec<bool> = series
        .bool()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// Tests
// =============================================================================
