//! Chart suggestions from column semantic types.

use crate::types::SemanticType;

/// Suggested chart kinds for an `x` column, optionally plotted against `y`.
///
/// Returns an empty list when no chart fits the combination.
pub fn recommend_chart_types(x: SemanticType, y: Option<SemanticType>) -> Vec<&'static str> {
    use SemanticType::*;

    match (x, y) {
        (Numeric, None) => vec!["histogram", "box"],
        (Categorical, None) => vec!["bar", "pie"],
        (Numeric, Some(Numeric)) => vec!["scatter", "line"],
        (Categorical, Some(Numeric)) => vec!["bar", "box"],
        (Datetime, Some(Numeric)) => vec!["line"],
        _ => Vec::new(),
    }
}
