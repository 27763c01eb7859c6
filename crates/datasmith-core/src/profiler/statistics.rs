//! Statistical helpers for column profiling.

use crate::types::{CorrelationMatrix, NumericSummary};
use crate::utils::{quantile_sorted, round_to, sort_floats};
use polars::prelude::*;

/// Summarize the non-null values of a numeric column.
///
/// Returns `None` when there are no values.
pub(crate) fn summarize_numeric(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let series = Series::new("values".into(), values);
    let mean = series.mean()?;
    let median = series.median()?;

    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);

    Some(NumericSummary {
        mean,
        median,
        std: sample_std(values, mean),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        q1: quantile_sorted(&sorted, 0.25),
        q3: quantile_sorted(&sorted, 0.75),
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1). A single value has zero spread.
pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}

/// Pearson correlation over rows where both values are present.
///
/// Returns NaN when fewer than two complete pairs exist or either side is
/// constant.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();

    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = mean(&xs);
    let mean_y = mean(&ys);
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in xs.iter().zip(&ys) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Build the rounded correlation matrix for the given numeric columns.
///
/// NaN coefficients become 0.0 and the diagonal is always 1.0. Returns
/// `None` with fewer than two columns.
pub(crate) fn correlation_matrix(
    columns: &[(String, Vec<Option<f64>>)],
    decimals: u32,
) -> Option<CorrelationMatrix> {
    if columns.len() < 2 {
        return None;
    }

    let size = columns.len();
    let mut values = vec![vec![0.0; size]; size];
    for i in 0..size {
        values[i][i] = 1.0;
        for j in (i + 1)..size {
            let r = pearson(&columns[i].1, &columns[j].1);
            let r = if r.is_nan() { 0.0 } else { round_to(r, decimals) };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let names = columns.iter().map(|(name, _)| name.clone()).collect();
    Some(CorrelationMatrix::new(names, values))
}
