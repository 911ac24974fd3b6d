//! Finalized life records and their timelines.
//!
//! A [`LifeRecord`] is the immutable, append-closed account of one
//! entity's full observed lifetime: created exactly once when the
//! entity leaves tracking, never mutated afterward. Its timeline holds
//! full snapshots, or a leading snapshot followed by overlays when the
//! recorder compacts, oldest first either way.

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::ids::RegionId;
use crate::overlay::SnapshotOverlay;
use crate::snapshot::{EntitySnapshot, Position};

/// One step of a record's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineEntry {
    /// A full capture of the entity's state.
    Snapshot(EntitySnapshot),
    /// A delta against the previous timeline state.
    Overlay(SnapshotOverlay),
}

/// An immutable finalized account of one entity's observed lifetime,
/// tied to a spatial origin and a region partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeRecord {
    name: String,
    origin: Position,
    region: RegionId,
    timeline: Vec<TimelineEntry>,
}

impl LifeRecord {
    /// Assemble a record from its finalized parts.
    ///
    /// `origin` is the entity's last known position and `region` its
    /// last known region, both fixed here for the record's lifetime.
    /// The timeline must be ordered oldest first.
    pub const fn new(
        name: String,
        origin: Position,
        region: RegionId,
        timeline: Vec<TimelineEntry>,
    ) -> Self {
        Self { name, origin, region, timeline }
    }

    /// Display label of the recorded entity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position the record is anchored to (the entity's last known
    /// position at finalize time).
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Partition key this record is stored under.
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// The timeline entries, oldest first.
    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    /// Number of timeline entries.
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Whether the timeline holds no entries.
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Materialize the timeline into full snapshots, oldest first.
    ///
    /// Overlays are applied onto the previously resolved state, never
    /// onto their stored sentinels. An overlay with no preceding
    /// snapshot fails with [`TimelineError::OverlayWithoutBase`].
    pub fn resolve(&self) -> Result<Vec<EntitySnapshot>, TimelineError> {
        let mut resolved: Vec<EntitySnapshot> = Vec::with_capacity(self.timeline.len());
        for (index, entry) in self.timeline.iter().enumerate() {
            let state = match entry {
                TimelineEntry::Snapshot(snapshot) => snapshot.clone(),
                TimelineEntry::Overlay(overlay) => {
                    let base =
                        resolved.last().ok_or(TimelineError::OverlayWithoutBase { index })?;
                    overlay.apply_to(base)
                }
            };
            resolved.push(state);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::item::ItemDescriptor;
    use crate::snapshot::{Orientation, Vitality};

    fn snapshot_at(x: f64, health: f32) -> EntitySnapshot {
        EntitySnapshot::new(
            Position::new(x, 64.0, 0.0),
            Orientation::new(45.0, 45.0),
            Some(ItemDescriptor::new("torch", 0)),
            vec![None, None, None, None],
            Vitality::new(20, health),
        )
    }

    #[test]
    fn accessors_reflect_construction() {
        let origin = Position::new(3.0, 64.0, 9.0);
        let record = LifeRecord::new(
            "Wanderer".to_owned(),
            origin,
            RegionId::new(-1),
            vec![TimelineEntry::Snapshot(snapshot_at(3.0, 20.0))],
        );

        assert_eq!(record.name(), "Wanderer");
        assert_eq!(record.origin(), origin);
        assert_eq!(record.region(), RegionId::new(-1));
        assert_eq!(record.len(), 1);
        assert!(!record.is_empty());
    }

    #[test]
    fn resolving_full_snapshots_is_identity() {
        let states = vec![snapshot_at(0.0, 20.0), snapshot_at(1.0, 20.0), snapshot_at(1.0, 18.0)];
        let record = LifeRecord::new(
            "Wanderer".to_owned(),
            Position::new(1.0, 64.0, 0.0),
            RegionId::new(0),
            states.iter().cloned().map(TimelineEntry::Snapshot).collect(),
        );

        assert_eq!(record.resolve().unwrap(), states);
    }

    #[test]
    fn resolving_compacted_timeline_reproduces_originals() {
        let states = vec![snapshot_at(0.0, 20.0), snapshot_at(2.0, 20.0), snapshot_at(2.0, 15.5)];
        let mut timeline = vec![TimelineEntry::Snapshot(states.first().unwrap().clone())];
        for pair in states.windows(2) {
            if let [base, next] = pair {
                timeline.push(TimelineEntry::Overlay(SnapshotOverlay::between(base, next)));
            }
        }
        let record = LifeRecord::new(
            "Wanderer".to_owned(),
            Position::new(2.0, 64.0, 0.0),
            RegionId::new(0),
            timeline,
        );

        assert_eq!(record.resolve().unwrap(), states);
    }

    #[test]
    fn leading_overlay_is_an_error() {
        let base = snapshot_at(0.0, 20.0);
        let next = snapshot_at(1.0, 20.0);
        let record = LifeRecord::new(
            "Wanderer".to_owned(),
            Position::ZERO,
            RegionId::new(0),
            vec![TimelineEntry::Overlay(SnapshotOverlay::between(&base, &next))],
        );

        assert_eq!(record.resolve(), Err(TimelineError::OverlayWithoutBase { index: 0 }));
    }

    #[test]
    fn empty_timeline_resolves_to_nothing() {
        let record = LifeRecord::new("Gone".to_owned(), Position::ZERO, RegionId::new(4), vec![]);
        assert!(record.is_empty());
        assert_eq!(record.resolve().unwrap(), Vec::<EntitySnapshot>::new());
    }
}
