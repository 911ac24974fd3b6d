//! The process-wide collection of finalized life records.
//!
//! Records live here between finalization and persistence (or between
//! load and unload). The store is not partitioned physically; every
//! record carries its region, and the partition-scoped operations
//! filter on it regardless of insertion order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vestige_types::{LifeRecord, RegionId};

/// In-memory, insertion-ordered collection of finalized records,
/// queryable and drainable by region.
///
/// Owned by the step-loop thread for the lifetime of a loaded
/// partition; `&mut self` on the mutating operations enforces that
/// exclusivity at compile time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStore {
    records: Vec<LifeRecord>,
}

impl RecordStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Append a record unconditionally; no deduplication.
    pub fn add(&mut self, record: LifeRecord) {
        self.records.push(record);
    }

    /// Append a batch of records in order, e.g. records loaded from a
    /// region archive.
    pub fn extend(&mut self, records: impl IntoIterator<Item = LifeRecord>) {
        self.records.extend(records);
    }

    /// All records under `region`, in insertion order, without
    /// removing them. Used for checkpoint saves.
    pub fn by_region(&self, region: RegionId) -> Vec<&LifeRecord> {
        self.records.iter().filter(|record| record.region() == region).collect()
    }

    /// Atomically return and remove all records under `region`, in
    /// insertion order. Records under other regions are untouched.
    /// Used on unload so persisted records are not re-saved later.
    pub fn drain_region(&mut self, region: RegionId) -> Vec<LifeRecord> {
        let (drained, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| record.region() == region);
        self.records = kept;
        drained
    }

    /// Every record currently held, in insertion order.
    pub fn all(&self) -> &[LifeRecord] {
        &self.records
    }

    /// The distinct regions with at least one record in the store.
    pub fn regions(&self) -> BTreeSet<RegionId> {
        self.records.iter().map(LifeRecord::region).collect()
    }

    /// Total number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
