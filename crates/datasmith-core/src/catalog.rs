//! In-memory dataset catalog.
//!
//! The catalog assigns identity to datasets, keeps raw and derived versions
//! side by side and answers "which version should I use" queries. The
//! pipeline itself only sees the [`DatasetSource`] trait.

use crate::dataset::{Dataset, DatasetId, DatasetSummary};
use crate::error::{DatasmithError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Anything that can hand out datasets by id.
pub trait DatasetSource {
    fn get(&self, id: DatasetId) -> Result<Dataset>;
}

struct Entry {
    seq: u64,
    dataset: Dataset,
}

/// Thread-safe catalog holding datasets in memory.
#[derive(Default)]
pub struct InMemoryCatalog {
    entries: RwLock<HashMap<DatasetId, Entry>>,
    next_seq: AtomicU64,
}

static_assertions::assert_impl_all!(InMemoryCatalog: Send, Sync);

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a dataset and return its id.
    pub fn register(&self, dataset: Dataset) -> DatasetId {
        let id = dataset.id();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        debug!("Registering dataset {} ('{}')", id, dataset.name());
        self.entries.write().insert(id, Entry { seq, dataset });
        id
    }

    /// Store a dataset derived from one already in the catalog.
    pub fn register_derived(&self, dataset: Dataset) -> Result<DatasetId> {
        let source = dataset.source_dataset_id().ok_or_else(|| {
            DatasmithError::Validation(format!("dataset '{}' has no source", dataset.id()))
        })?;
        if !self.contains(source) {
            return Err(DatasmithError::dataset_not_found(source));
        }
        Ok(self.register(dataset))
    }

    pub fn contains(&self, id: DatasetId) -> bool {
        self.entries.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Summaries of every dataset, oldest registration first.
    pub fn list(&self) -> Vec<DatasetSummary> {
        let entries = self.entries.read();
        let mut all: Vec<&Entry> = entries.values().collect();
        all.sort_by_key(|e| e.seq);
        all.into_iter().map(|e| e.dataset.summary()).collect()
    }

    /// Remove a dataset, returning it.
    pub fn remove(&self, id: DatasetId) -> Result<Dataset> {
        self.entries
            .write()
            .remove(&id)
            .map(|e| e.dataset)
            .ok_or_else(|| DatasmithError::dataset_not_found(id))
    }

    /// Cleaned children of `id`, most recent first.
    pub fn cleaned_versions(&self, id: DatasetId) -> Vec<DatasetId> {
        let entries = self.entries.read();
        let mut children: Vec<&Entry> = entries
            .values()
            .filter(|e| e.dataset.source_dataset_id() == Some(id))
            .collect();
        children.sort_by_key(|e| std::cmp::Reverse(e.seq));
        children.into_iter().map(|e| e.dataset.id()).collect()
    }

    /// The most recent cleaned child of `id`, or the dataset itself.
    pub fn resolve_best(&self, id: DatasetId) -> Result<Dataset> {
        let entries = self.entries.read();
        let own = entries
            .get(&id)
            .ok_or_else(|| DatasmithError::dataset_not_found(id))?;

        let best = entries
            .values()
            .filter(|e| e.dataset.source_dataset_id() == Some(id))
            .max_by_key(|e| e.seq)
            .unwrap_or(own);
        Ok(best.dataset.clone())
    }
}

impl DatasetSource for InMemoryCatalog {
    fn get(&self, id: DatasetId) -> Result<Dataset> {
        self.entries
            .read()
            .get(&id)
            .map(|e| e.dataset.clone())
            .ok_or_else(|| DatasmithError::dataset_not_found(id))
    }
}
