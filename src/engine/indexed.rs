use tracing::{debug, error, info, trace};

use crate::{
    config::{Settings, StoreConfig},
    database::{AvlIter, AvlStatistics, AvlTree, Record, SearchProbe},
    error::{StoreError, StoreResult},
};

/// Record store indexed by an AVL tree ordered on `Record::value`.
///
/// The `key` accepted by [`search`](Self::search) and
/// [`delete`](Self::delete) is not part of the ordering: lookups match on
/// `value` alone and the key is only recorded in trace events.
#[derive(Debug, Clone, Default)]
pub struct IndexedDatabase {
    index: AvlTree,
    config: StoreConfig,
}

impl IndexedDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            index: AvlTree::new(),
            config,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_config(settings.store.clone())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read-only access to the underlying tree.
    pub fn index(&self) -> &AvlTree {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Inserts a record. Returns `false` and keeps the stored record when its
    /// value is already indexed.
    pub fn insert(
        &mut self,
        record: Record,
    ) -> bool {
        let value = record.value();
        let inserted = self.index.insert(record);

        if inserted {
            trace!(value, len = self.index.len(), "Record inserted");
        } else {
            debug!(value, "Duplicate value ignored");
        }

        self.after_write("insert");
        inserted
    }

    pub fn search(
        &self,
        key: &str,
        value: i64,
    ) -> Option<&Record> {
        self.probe(key, value).record
    }

    /// Removes the record stored under `value` and hands it back.
    pub fn delete(
        &mut self,
        key: &str,
        value: i64,
    ) -> Option<Record> {
        let removed = self.index.delete(value);

        match &removed {
            Some(_) => trace!(key, value, len = self.index.len(), "Record deleted"),
            None => debug!(key, value, "Delete of absent value ignored"),
        }

        self.after_write("delete");
        removed
    }

    /// Records with `start <= value <= end`, ascending. An inverted range
    /// yields an empty vector.
    pub fn range_query(
        &self,
        start: i64,
        end: i64,
    ) -> Vec<&Record> {
        let result = self.index.range(start, end);
        trace!(start, end, matched = result.len(), "Range query");
        result
    }

    /// Drops every record and resets the index to empty.
    pub fn clear(&mut self) {
        let released = self.index.clear();
        info!(released, "Index cleared");
    }

    /// Height recomputed by a full traversal, ignoring cached node heights.
    pub fn tree_height(&self) -> usize {
        self.index.computed_height()
    }

    /// Runs a fresh search and returns how many nodes it visited.
    pub fn search_comparisons(
        &self,
        key: &str,
        value: i64,
    ) -> usize {
        self.probe(key, value).comparisons
    }

    pub fn iter(&self) -> AvlIter<'_> {
        self.index.iter()
    }

    pub fn statistics(&self) -> AvlStatistics {
        self.index.statistics()
    }

    /// Checks tree invariants and compares the cached root height with
    /// [`tree_height`](Self::tree_height).
    pub fn check_consistency(&self) -> StoreResult<()> {
        self.index.validate_invariants()?;

        let cached = self.index.height();
        let computed = self.tree_height();

        if cached != computed {
            return Err(StoreError::HeightMismatch { cached, computed });
        }

        Ok(())
    }

    fn probe(
        &self,
        key: &str,
        value: i64,
    ) -> SearchProbe<'_> {
        let probe = self.index.probe(value);
        trace!(
            key,
            value,
            found = probe.record.is_some(),
            comparisons = probe.comparisons,
            "Search"
        );
        probe
    }

    fn after_write(
        &self,
        operation: &'static str,
    ) {
        if !self.config.validate_writes {
            return;
        }

        if let Err(e) = self.check_consistency() {
            error!(operation, error = %e, "Index consistency check failed");
        }
    }
}

impl Extend<Record> for IndexedDatabase {
    fn extend<I: IntoIterator<Item = Record>>(
        &mut self,
        iter: I,
    ) {
        for record in iter {
            self.insert(record);
        }
    }
}
