//! Per-step captures of a tracked entity's observable state.
//!
//! A snapshot is immutable once constructed and is only ever built from
//! a live observation of the tracked entity. Its fields are grouped the
//! way change detection treats them: position, orientation, and
//! vitality are each one group compared as a unit, while the held item
//! and every equipment slot are compared individually.

use serde::{Deserialize, Serialize};

use crate::item::ItemDescriptor;

/// Conventional number of equipment slots a host observes per entity.
///
/// The wire format carries the actual slot count per snapshot, so
/// snapshots with other lengths still round-trip exactly; this constant
/// is the convention hosts are expected to follow when capturing.
pub const EQUIPMENT_SLOTS: usize = 4;

/// A position in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// East/west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North/south coordinate.
    pub z: f64,
}

impl Position {
    /// The all-zero position, used as the unchanged-group sentinel in
    /// overlays.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Build a position from its coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Body and head facing angles, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Body yaw.
    pub yaw: f32,
    /// Head yaw.
    pub head_yaw: f32,
}

impl Orientation {
    /// The all-zero orientation, used as the unchanged-group sentinel
    /// in overlays.
    pub const ZERO: Self = Self { yaw: 0.0, head_yaw: 0.0 };

    /// Build an orientation from its angles.
    pub const fn new(yaw: f32, head_yaw: f32) -> Self {
        Self { yaw, head_yaw }
    }
}

/// Food and health levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitality {
    /// Satiation level.
    pub food: i32,
    /// Health level.
    pub health: f32,
}

impl Vitality {
    /// The all-zero vitality, used as the unchanged-group sentinel in
    /// overlays.
    pub const ZERO: Self = Self { food: 0, health: 0.0 };

    /// Build a vitality from its levels.
    pub const fn new(food: i32, health: f32) -> Self {
        Self { food, health }
    }
}

/// One capture of an entity's observable state at one simulation step.
///
/// Snapshots are immutable by convention: nothing in this workspace
/// mutates one after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Where the entity stood.
    pub position: Position,
    /// Which way the entity faced.
    pub orientation: Orientation,
    /// The item held in hand, if any.
    pub held_item: Option<ItemDescriptor>,
    /// One entry per equipment slot, in slot order; `None` marks an
    /// empty slot. Hosts conventionally capture [`EQUIPMENT_SLOTS`]
    /// entries.
    pub equipment: Vec<Option<ItemDescriptor>>,
    /// Food and health at the moment of capture.
    pub vitality: Vitality,
}

impl EntitySnapshot {
    /// Build a snapshot from a live observation.
    pub const fn new(
        position: Position,
        orientation: Orientation,
        held_item: Option<ItemDescriptor>,
        equipment: Vec<Option<ItemDescriptor>>,
        vitality: Vitality,
    ) -> Self {
        Self { position, orientation, held_item, equipment, vitality }
    }

    /// The item in the given equipment slot, if the slot exists and is
    /// occupied.
    pub fn equipment_slot(&self, index: usize) -> Option<&ItemDescriptor> {
        self.equipment.get(index).and_then(Option::as_ref)
    }
}
