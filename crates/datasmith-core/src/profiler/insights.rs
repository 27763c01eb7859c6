//! Cross-column insights: grouped category means, extremes and the
//! dataset overview lists.

use crate::config::CleaningConfig;
use crate::types::{
    CategoryInsights, ColumnProfile, CorrelationMatrix, Extremes, ProfileOverview, SemanticType,
    StrongCorrelation,
};
use crate::utils::{round_to, sort_floats};
use std::collections::BTreeMap;

/// Mean of every numeric column grouped by each category value.
///
/// `categorical` holds row-aligned category labels; `numeric` holds
/// row-aligned values. Rows with a null label are skipped, as are groups
/// with no numeric values.
pub(crate) fn category_insights(
    categorical: &[(String, Vec<Option<String>>)],
    numeric: &[(String, Vec<Option<f64>>)],
    decimals: u32,
) -> CategoryInsights {
    let mut insights = CategoryInsights::new();

    for (cat_name, labels) in categorical {
        let mut per_numeric = BTreeMap::new();

        for (num_name, values) in numeric {
            let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
            for (label, value) in labels.iter().zip(values) {
                if let (Some(label), Some(value)) = (label, value) {
                    let entry = groups.entry(label.as_str()).or_insert((0.0, 0));
                    entry.0 += value;
                    entry.1 += 1;
                }
            }

            let means: BTreeMap<String, f64> = groups
                .into_iter()
                .map(|(label, (sum, count))| {
                    (label.to_string(), round_to(sum / count as f64, decimals))
                })
                .collect();
            per_numeric.insert(num_name.clone(), means);
        }

        insights.insert(cat_name.clone(), per_numeric);
    }

    insights
}

/// The `count` largest and smallest values, rounded.
pub(crate) fn extremes(values: &[f64], count: usize, decimals: u32) -> Extremes {
    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);

    let bottom = sorted
        .iter()
        .take(count)
        .map(|v| round_to(*v, decimals))
        .collect();
    let top = sorted
        .iter()
        .rev()
        .take(count)
        .map(|v| round_to(*v, decimals))
        .collect();

    Extremes {
        top_5: top,
        bottom_5: bottom,
    }
}

/// Overview lists derived from column profiles and the correlation matrix.
pub(crate) fn overview(
    columns: &[ColumnProfile],
    correlations: Option<&CorrelationMatrix>,
    config: &CleaningConfig,
) -> ProfileOverview {
    let names_of = |wanted: SemanticType| -> Vec<String> {
        columns
            .iter()
            .filter(|c| c.semantic_type == wanted)
            .map(|c| c.name.clone())
            .collect()
    };

    let missing_summary = columns
        .iter()
        .filter(|c| c.missing_count > 0)
        .map(|c| {
            (
                c.name.clone(),
                round_to(c.missing_fraction, config.round_decimals),
            )
        })
        .collect();

    let high_cardinality_columns = columns
        .iter()
        .filter(|c| c.distinct_count > config.high_cardinality_threshold)
        .map(|c| c.name.clone())
        .collect();

    let strong_correlations = correlations
        .map(|matrix| {
            matrix
                .pairs()
                .filter(|(_, _, r)| r.abs() > config.strong_correlation_threshold)
                .map(|(a, b, r)| StrongCorrelation {
                    col1: a.to_string(),
                    col2: b.to_string(),
                    correlation: r,
                })
                .collect()
        })
        .unwrap_or_default();

    ProfileOverview {
        numeric_columns: names_of(SemanticType::Numeric),
        categorical_columns: names_of(SemanticType::Categorical),
        missing_summary,
        high_cardinality_columns,
        strong_correlations,
    }
}
