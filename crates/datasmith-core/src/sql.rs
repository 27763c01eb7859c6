//! Guard for generated SQL.
//!
//! Only a single read-only `SELECT` statement is allowed through.

use crate::error::{DatasmithError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(sql)?").expect("Invalid regex: code fence"));

static LEADING_SELECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^select\b").expect("Invalid regex: select"));

/// Normalize a generated query and reject anything but one `SELECT`.
///
/// Markdown code fences and trailing semicolons are stripped; the returned
/// statement ends with exactly one `;`.
pub fn validate_select_sql(sql: &str) -> Result<String> {
    let without_fences = CODE_FENCE.replace_all(sql.trim(), "");
    let statement = without_fences.trim().trim_end_matches([';', ' ', '\n', '\t', '\r']);

    if !LEADING_SELECT.is_match(statement) {
        return Err(DatasmithError::Validation(
            "only SELECT queries are allowed".to_string(),
        ));
    }
    if statement.contains(';') {
        return Err(DatasmithError::Validation(
            "only a single statement is allowed".to_string(),
        ));
    }

    Ok(format!("{statement};"))
}
