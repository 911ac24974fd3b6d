//! Item descriptors for held and equipped items.

use serde::{Deserialize, Serialize};

/// A host-defined item reference: a string identifier plus an integer
/// metadata/damage value.
///
/// Equality is structural over both fields, which is what snapshot
/// compaction uses to decide whether a held or equipped item changed
/// between two steps. Absent items are represented as
/// `Option<ItemDescriptor>::None`, so "nothing held" versus "nothing
/// held" never registers as a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Host item identifier (e.g. a registry name).
    pub id: String,
    /// Item metadata value (variant, damage, or similar).
    pub meta: i32,
}

impl ItemDescriptor {
    /// Build a descriptor from an identifier and metadata value.
    pub fn new(id: impl Into<String>, meta: i32) -> Self {
        Self { id: id.into(), meta }
    }
}

impl core::fmt::Display for ItemDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#{}", self.id, self.meta)
    }
}
