//! Per-entity state recording with lazy container lifecycle.
//!
//! The recorder owns one live container per tracked entity, created on
//! the first observation of that identity and destroyed when the
//! entity leaves tracking. Each observation appends one snapshot;
//! finalizing converts the accumulated sequence into an immutable
//! [`LifeRecord`] anchored at the entity's last known position and
//! region.
//!
//! Containers accumulate full snapshots and compact only at finalize
//! time, so a bounded history evicts raw snapshots and can never evict
//! the base snapshot out from under an overlay chain.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::num::NonZeroU32;

use thiserror::Error;
use tracing::trace;
use vestige_types::{
    EntityId, EntitySnapshot, LifeRecord, Position, RegionId, SnapshotOverlay, TimelineEntry,
};

use crate::buffer::EvictingBuffer;

/// Errors raised by the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecorderError {
    /// The nil UUID was passed as an entity identity. Rejected before
    /// any state mutation.
    #[error("entity identity is the nil UUID")]
    NilEntity,

    /// No live container exists for the entity. Non-fatal: the caller
    /// simply has no record to emit. Arises when an entity is removed
    /// twice or removed without ever being observed.
    #[error("no live container for entity {entity}")]
    UnknownEntity {
        /// The identity that had no container.
        entity: EntityId,
    },
}

/// Live accumulation state for one currently-tracked entity.
///
/// Exclusively owned by the recorder map and never shared; the display
/// label is fixed at first observation.
#[derive(Debug)]
struct TraceContainer {
    label: String,
    states: EvictingBuffer<EntitySnapshot>,
    last_position: Position,
    last_region: RegionId,
}

impl TraceContainer {
    fn new(label: &str, history_limit: Option<NonZeroU32>) -> Self {
        let states = match history_limit {
            Some(limit) => EvictingBuffer::bounded(limit_to_capacity(limit)),
            None => EvictingBuffer::unbounded(),
        };
        Self {
            label: label.to_owned(),
            states,
            last_position: Position::ZERO,
            last_region: RegionId::new(0),
        }
    }

    fn push(&mut self, region: RegionId, snapshot: EntitySnapshot) {
        self.last_position = snapshot.position;
        self.last_region = region;
        self.states.add(snapshot);
    }

    fn into_record(self, compact_overlays: bool) -> LifeRecord {
        let states = self.states.into_vec();
        let mut timeline = Vec::with_capacity(states.len());
        if compact_overlays {
            let mut previous: Option<&EntitySnapshot> = None;
            for state in &states {
                match previous {
                    None => timeline.push(TimelineEntry::Snapshot(state.clone())),
                    Some(base) => {
                        timeline.push(TimelineEntry::Overlay(SnapshotOverlay::between(base, state)));
                    }
                }
                previous = Some(state);
            }
        } else {
            timeline.extend(states.into_iter().map(TimelineEntry::Snapshot));
        }
        LifeRecord::new(self.label, self.last_position, self.last_region, timeline)
    }
}

fn limit_to_capacity(limit: NonZeroU32) -> usize {
    usize::try_from(limit.get()).unwrap_or(usize::MAX)
}

/// Records per-step snapshots for every tracked entity and finalizes
/// them into [`LifeRecord`]s when entities leave tracking.
///
/// Designed for a single owner thread (the host's step loop); `&mut
/// self` makes cross-thread misuse a compile error.
#[derive(Debug)]
pub struct TraceRecorder {
    containers: BTreeMap<EntityId, TraceContainer>,
    compact_overlays: bool,
    history_limit: Option<NonZeroU32>,
}

impl TraceRecorder {
    /// Create a recorder with default settings: full snapshots, no
    /// history bound.
    pub const fn new() -> Self {
        Self::with_settings(false, None)
    }

    /// Create a recorder with explicit settings.
    ///
    /// With `compact_overlays`, finalized timelines carry one full
    /// snapshot followed by overlays; `history_limit` caps the number
    /// of snapshots retained per entity, keeping the most recent ones.
    pub const fn with_settings(
        compact_overlays: bool,
        history_limit: Option<NonZeroU32>,
    ) -> Self {
        Self { containers: BTreeMap::new(), compact_overlays, history_limit }
    }

    /// Record one observation of `entity`.
    ///
    /// The first observation of a previously-unseen identity creates a
    /// live container seeded with this snapshot and labeled with
    /// `label`; later observations append to the existing container
    /// and leave its label untouched. `region` updates the entity's
    /// last known region each call.
    pub fn observe(
        &mut self,
        entity: EntityId,
        label: &str,
        region: RegionId,
        snapshot: EntitySnapshot,
    ) -> Result<(), RecorderError> {
        if entity.is_nil() {
            return Err(RecorderError::NilEntity);
        }
        match self.containers.entry(entity) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().push(region, snapshot);
            }
            Entry::Vacant(vacant) => {
                trace!(%entity, label, "creating trace container");
                let container = vacant.insert(TraceContainer::new(label, self.history_limit));
                container.push(region, snapshot);
            }
        }
        Ok(())
    }

    /// Remove `entity`'s live container and build its final record.
    ///
    /// The record carries the container's label, the accumulated
    /// snapshot sequence (compacted to overlays when configured), and
    /// the entity's last known position and region. An identity with
    /// no live container yields [`RecorderError::UnknownEntity`],
    /// which callers treat as "nothing to emit".
    pub fn finalize(&mut self, entity: EntityId) -> Result<LifeRecord, RecorderError> {
        if entity.is_nil() {
            return Err(RecorderError::NilEntity);
        }
        let container = self
            .containers
            .remove(&entity)
            .ok_or(RecorderError::UnknownEntity { entity })?;
        Ok(container.into_record(self.compact_overlays))
    }

    /// Whether a live container exists for `entity`.
    pub fn is_tracking(&self, entity: EntityId) -> bool {
        self.containers.contains_key(&entity)
    }

    /// Number of live containers.
    pub fn live_count(&self) -> usize {
        self.containers.len()
    }

    /// Identities currently being tracked, in stable order.
    pub fn tracked(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.containers.keys().copied()
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}
