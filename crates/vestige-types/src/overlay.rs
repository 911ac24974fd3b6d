//! Field-wise deltas between chronologically adjacent snapshots.
//!
//! An overlay records, per tracked field group, whether the group
//! changed between a `base` snapshot and the `next` one, and carries
//! the new value only when it did. Unchanged groups store a zero/empty
//! sentinel, never the true value, so consumers reconstructing state
//! must fall back to the previously reconstructed state for unflagged
//! groups. [`SnapshotOverlay::apply_to`] implements exactly that rule
//! and is the only supported way to consume an overlay.

use serde::{Deserialize, Serialize};

use crate::item::ItemDescriptor;
use crate::snapshot::{EntitySnapshot, Orientation, Position, Vitality};

/// Sentinel for unchanged or out-of-range equipment slots.
const EMPTY_SLOT: Option<ItemDescriptor> = None;

/// A compact delta between two adjacent snapshots.
///
/// Overlays are derived, never assembled by hand:
/// [`SnapshotOverlay::between`] is a pure function of `(base, next)`
/// and the only constructor. Change flags and values are read through
/// accessors so the flag/value pairing cannot be torn apart.
// One change flag per field group, not a state machine.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOverlay {
    held_changed: bool,
    held_item: Option<ItemDescriptor>,
    equipment_changed: Vec<bool>,
    equipment: Vec<Option<ItemDescriptor>>,
    position_changed: bool,
    position: Position,
    orientation_changed: bool,
    orientation: Orientation,
    vitality_changed: bool,
    vitality: Vitality,
}

impl SnapshotOverlay {
    /// Compute the delta from `base` to `next`.
    ///
    /// Field groups are compared by value: structurally for item
    /// descriptors, numerically for coordinates, angles, and vitality.
    /// The slot count follows `base`; a slot missing from `next`
    /// compares as empty. Neither input is mutated.
    pub fn between(base: &EntitySnapshot, next: &EntitySnapshot) -> Self {
        let held_changed = base.held_item != next.held_item;
        let held_item = if held_changed { next.held_item.clone() } else { None };

        let slot_count = base.equipment.len();
        let mut equipment_changed = Vec::with_capacity(slot_count);
        let mut equipment = Vec::with_capacity(slot_count);
        for (index, base_slot) in base.equipment.iter().enumerate() {
            let next_slot = next.equipment.get(index).unwrap_or(&EMPTY_SLOT);
            let changed = base_slot != next_slot;
            equipment_changed.push(changed);
            equipment.push(if changed { next_slot.clone() } else { None });
        }

        let position_changed = base.position != next.position;
        let orientation_changed = base.orientation != next.orientation;
        let vitality_changed = base.vitality != next.vitality;

        Self {
            held_changed,
            held_item,
            equipment_changed,
            equipment,
            position_changed,
            position: if position_changed { next.position } else { Position::ZERO },
            orientation_changed,
            orientation: if orientation_changed { next.orientation } else { Orientation::ZERO },
            vitality_changed,
            vitality: if vitality_changed { next.vitality } else { Vitality::ZERO },
        }
    }

    /// Reconstruct the `next` snapshot this overlay was derived from,
    /// given the same `base`.
    ///
    /// Flagged groups take the overlay's value; unflagged groups fall
    /// back to `base`. The sentinel stored for an unflagged group is
    /// never used.
    pub fn apply_to(&self, base: &EntitySnapshot) -> EntitySnapshot {
        let held_item =
            if self.held_changed { self.held_item.clone() } else { base.held_item.clone() };

        let mut equipment = Vec::with_capacity(base.equipment.len());
        for (index, base_slot) in base.equipment.iter().enumerate() {
            if self.slot_changed(index) {
                equipment.push(self.equipment.get(index).and_then(Clone::clone));
            } else {
                equipment.push(base_slot.clone());
            }
        }

        EntitySnapshot::new(
            if self.position_changed { self.position } else { base.position },
            if self.orientation_changed { self.orientation } else { base.orientation },
            held_item,
            equipment,
            if self.vitality_changed { self.vitality } else { base.vitality },
        )
    }

    /// Whether any field group changed at all.
    pub fn has_changes(&self) -> bool {
        self.held_changed
            || self.position_changed
            || self.orientation_changed
            || self.vitality_changed
            || self.equipment_changed.iter().any(|changed| *changed)
    }

    /// Whether the held item changed.
    pub const fn held_changed(&self) -> bool {
        self.held_changed
    }

    /// The new held item, meaningful only when [`Self::held_changed`]
    /// is true (a flagged `None` means the hand was emptied).
    pub const fn held_item(&self) -> Option<&ItemDescriptor> {
        self.held_item.as_ref()
    }

    /// Number of equipment slots this overlay tracks.
    pub fn slot_count(&self) -> usize {
        self.equipment_changed.len()
    }

    /// Whether the given equipment slot changed. Out-of-range slots
    /// report unchanged.
    pub fn slot_changed(&self, index: usize) -> bool {
        self.equipment_changed.get(index).copied().unwrap_or(false)
    }

    /// The new item in the given slot, meaningful only when
    /// [`Self::slot_changed`] reports true for it.
    pub fn slot_item(&self, index: usize) -> Option<&ItemDescriptor> {
        self.equipment.get(index).and_then(Option::as_ref)
    }

    /// Whether the position group changed.
    pub const fn position_changed(&self) -> bool {
        self.position_changed
    }

    /// The new position, or [`Position::ZERO`] when unchanged.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether the orientation group changed.
    pub const fn orientation_changed(&self) -> bool {
        self.orientation_changed
    }

    /// The new orientation, or [`Orientation::ZERO`] when unchanged.
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the vitality group changed.
    pub const fn vitality_changed(&self) -> bool {
        self.vitality_changed
    }

    /// The new vitality, or [`Vitality::ZERO`] when unchanged.
    pub const fn vitality(&self) -> Vitality {
        self.vitality
    }
}
