use crate::dataset::DatasetId;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Inferred meaning of a column beyond its storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Numeric,
    Categorical,
    Datetime,
    Email,
    Text,
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
            Self::Email => "email",
            Self::Text => "text",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics of a numeric column, over non-null values.
///
/// `std` is the sample standard deviation (ddof = 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    #[serde(rename = "25%")]
    pub q1: f64,
    #[serde(rename = "75%")]
    pub q3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub semantic_type: SemanticType,
    pub missing_count: usize,
    pub missing_fraction: f64,
    pub distinct_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

/// Per-column result of missing-value imputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledValues {
    pub filled_values: usize,
}

/// Structured record of every value-changing operation applied by cleaning.
///
/// Columns an operation did not change are never present under its key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub missing_values_filled: BTreeMap<String, FilledValues>,
    pub outliers_removed: BTreeMap<String, usize>,
}

impl CleaningReport {
    /// Total number of cells filled across all columns.
    pub fn total_filled(&self) -> usize {
        self.missing_values_filled
            .values()
            .map(|f| f.filled_values)
            .sum()
    }

    /// Total number of rows removed by outlier fencing.
    pub fn total_outliers_removed(&self) -> usize {
        self.outliers_removed.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.missing_values_filled.is_empty() && self.outliers_removed.is_empty()
    }
}

/// Tukey fence computed for one column at its outlier-filter step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fence {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fence {
    pub fn from_quartiles(q1: f64, q3: f64, multiplier: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Fence applied to a named column, with the rows it removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFence {
    pub column: String,
    pub fence: Fence,
    pub rows_entering: usize,
    pub rows_removed: usize,
}

/// Symmetric Pearson correlation matrix over numeric columns.
///
/// Serializes as a nested `column -> column -> coefficient` map in column
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub(crate) fn new(columns: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Unordered pairs `(a, b, r)` with `a` before `b` in column order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        (0..self.columns.len()).flat_map(move |i| {
            ((i + 1)..self.columns.len()).map(move |j| {
                (
                    self.columns[i].as_str(),
                    self.columns[j].as_str(),
                    self.values[i][j],
                )
            })
        })
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct Row<'a> {
            columns: &'a [String],
            values: &'a [f64],
        }

        impl Serialize for Row<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                for (name, value) in self.columns.iter().zip(self.values) {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, row) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(
                name,
                &Row {
                    columns: &self.columns,
                    values: row,
                },
            )?;
        }
        map.end()
    }
}

/// Pair of numeric columns whose correlation exceeds the strong threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongCorrelation {
    pub col1: String,
    pub col2: String,
    pub correlation: f64,
}

/// Largest and smallest values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub top_5: Vec<f64>,
    pub bottom_5: Vec<f64>,
}

/// categorical column -> numeric column -> category value -> mean
pub type CategoryInsights = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// Dataset-level overview lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileOverview {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// Column -> missing fraction, only for columns with missing values.
    pub missing_summary: BTreeMap<String, f64>,
    pub high_cardinality_columns: Vec<String>,
    pub strong_correlations: Vec<StrongCorrelation>,
}

/// Full profile of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub dataset_id: DatasetId,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<ColumnProfile>,
    pub numeric_summary: BTreeMap<String, NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationMatrix>,
    pub category_insights: CategoryInsights,
    pub extremes: BTreeMap<String, Extremes>,
    pub overview: ProfileOverview,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}
