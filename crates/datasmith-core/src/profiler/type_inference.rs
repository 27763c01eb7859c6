//! Semantic type inference for columns.
//!
//! Classification runs on the first `inference_sample_size` non-null values
//! and takes a strict-majority vote for the email and datetime checks, so a
//! single unrepresentative leading row cannot decide the type on its own.

use crate::config::CleaningConfig;
use crate::error::{DatasmithError, Result};
use crate::types::SemanticType;
use crate::utils::{
    distinct_count, is_datetime_dtype, is_numeric_dtype, is_string_dtype, is_supported_dtype,
    leading_string_samples,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid regex: email")
});

const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%d.%m.%Y",
    "%b %d, %Y", "%d %b %Y",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Classify one column.
///
/// Returns [`DatasmithError::UnsupportedType`] for storage types the pipeline
/// cannot reason about (lists, structs, binary blobs).
pub fn infer_semantic_type(series: &Series, config: &CleaningConfig) -> Result<SemanticType> {
    let dtype = series.dtype();
    if !is_supported_dtype(dtype) {
        return Err(DatasmithError::UnsupportedType {
            column: series.name().to_string(),
            dtype: format!("{dtype:?}"),
            operation: "type inference",
        });
    }

    if series.null_count() == series.len() {
        return Ok(SemanticType::Unknown);
    }

    if is_string_dtype(dtype) {
        let samples = leading_string_samples(series, config.inference_sample_size)?;
        if strict_majority(&samples, is_email) {
            return Ok(SemanticType::Email);
        }
        if strict_majority(&samples, parses_as_datetime) {
            return Ok(SemanticType::Datetime);
        }
    }

    if is_datetime_dtype(dtype) {
        return Ok(SemanticType::Datetime);
    }

    if is_numeric_dtype(dtype) {
        return Ok(SemanticType::Numeric);
    }

    if distinct_count(series)? <= config.category_max_distinct {
        Ok(SemanticType::Categorical)
    } else {
        Ok(SemanticType::Text)
    }
}

/// Classify every column of a frame, in column order.
pub fn infer_column_types(
    df: &DataFrame,
    config: &CleaningConfig,
) -> Result<Vec<(String, SemanticType)>> {
    df.get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            let semantic = infer_semantic_type(series, config)?;
            debug!("Inferred '{}' ({:?}) as {}", series.name(), series.dtype(), semantic);
            Ok((series.name().to_string(), semantic))
        })
        .collect()
}

/// Whether a single value has the `local@domain.tld` shape.
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Whether a single value parses as a calendar date or timestamp.
///
/// Bare numbers never count, even if they could be epoch timestamps.
pub fn parses_as_datetime(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
        return false;
    }

    DateTime::parse_from_rfc3339(trimmed).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(trimmed, fmt).is_ok())
}

fn strict_majority(samples: &[String], predicate: impl Fn(&str) -> bool) -> bool {
    if samples.is_empty() {
        return false;
    }
    let hits = samples.iter().filter(|s| predicate(s)).count();
    hits * 2 > samples.len()
}
