//! The dataset value type.
//!
//! A [`Dataset`] wraps a polars `DataFrame` together with its identity and
//! lineage. Datasets are never mutated in place: cleaning produces a new
//! dataset via [`Dataset::derive`], which records the parent's id in
//! `source_dataset_id`. Cloning is cheap because polars columns are
//! reference counted.

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque dataset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DatasetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// An immutable tabular dataset with lineage metadata.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: DatasetId,
    source_dataset_id: Option<DatasetId>,
    name: String,
    created_at: DateTime<Utc>,
    frame: DataFrame,
}

// Datasets are handed between independent callers on different threads.
static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Wrap a freshly ingested frame as a raw dataset.
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            id: DatasetId::new(),
            source_dataset_id: None,
            name: name.into(),
            created_at: Utc::now(),
            frame,
        }
    }

    /// Build a new dataset derived from `self`, carrying `self.id` as source.
    pub fn derive(&self, frame: DataFrame) -> Self {
        Self {
            id: DatasetId::new(),
            source_dataset_id: Some(self.id),
            name: format!("{}_cleaned", self.name),
            created_at: Utc::now(),
            frame,
        }
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn source_dataset_id(&self) -> Option<DatasetId> {
        self.source_dataset_id
    }

    /// A dataset with no source is raw.
    pub fn is_raw(&self) -> bool {
        self.source_dataset_id.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Lightweight description used by the catalog listing.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id,
            source_dataset_id: self.source_dataset_id,
            name: self.name.clone(),
            created_at: self.created_at,
            is_cleaned: !self.is_raw(),
            rows: self.height(),
            columns: self.width(),
        }
    }
}

/// Metadata row describing a dataset without its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: DatasetId,
    pub source_dataset_id: Option<DatasetId>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_cleaned: bool,
    pub rows: usize,
    pub columns: usize,
}
