//! Error types for the cleaning and profiling pipeline.
//!
//! Every error carries enough context (column name, operation) to reproduce
//! the failure. Errors serialize as `{code, message}` so a service layer can
//! forward them to its clients unchanged.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum DatasmithError {
    /// A referenced dataset or column does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Malformed input such as an empty dataset or an unreadable file.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A column's storage type cannot be classified or imputed.
    #[error("Unsupported type {dtype} for column '{column}' during {operation}")]
    UnsupportedType {
        column: String,
        dtype: String,
        operation: &'static str,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Spreadsheet reading error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DatasmithError>,
    },
}

impl DatasmithError {
    /// Shorthand for a missing dataset.
    pub fn dataset_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            kind: "Dataset",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing column.
    pub fn column_not_found(name: impl ToString) -> Self {
        Self::NotFound {
            kind: "Column",
            id: name.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DatasmithError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The innermost error, with any context layers peeled off.
    pub fn root(&self) -> &DatasmithError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    pub fn is_unsupported_type(&self) -> bool {
        matches!(self.root(), Self::UnsupportedType { .. })
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DatasmithError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DatasmithError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, DatasmithError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DatasmithError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            DatasmithError::dataset_not_found("abc").error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            DatasmithError::Validation("empty".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        let err = DatasmithError::UnsupportedType {
            column: "tags".to_string(),
            dtype: "List(String)".to_string(),
            operation: "type inference",
        };
        assert_eq!(err.error_code(), "UNSUPPORTED_TYPE");
    }

    #[test]
    fn test_unsupported_type_message_names_column_and_operation() {
        let err = DatasmithError::UnsupportedType {
            column: "tags".to_string(),
            dtype: "List(String)".to_string(),
            operation: "type inference",
        };
        let msg = err.to_string();
        assert!(msg.contains("tags"));
        assert!(msg.contains("type inference"));
    }

    #[test]
    fn test_error_serialization() {
        let error = DatasmithError::column_not_found("Age");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context_preserves_code_and_kind() {
        let error = DatasmithError::dataset_not_found("42").with_context("During cleaning");
        assert!(error.to_string().contains("During cleaning"));
        assert_eq!(error.error_code(), "NOT_FOUND");
        assert!(error.is_not_found());
        assert!(!error.is_unsupported_type());
    }
}
