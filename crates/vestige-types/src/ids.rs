//! Type-safe identifier wrappers for tracked entities and regions.
//!
//! Entity identities are UUIDs supplied by the host simulation; the
//! newtype prevents accidental mixing with other UUID-valued data at
//! compile time. Region identifiers are plain signed 32-bit integers
//! because that is exactly what the archive wire format stores for a
//! record's partition key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tracked entity.
///
/// The nil UUID is reserved: the recorder rejects it as a malformed
/// identity before mutating any state. The `new()` constructor exists
/// for cases where app-side generation is needed (e.g. tests); real
/// identities normally come from the host via [`From<Uuid>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Whether this is the nil UUID, which is never a valid identity.
    pub const fn is_nil(self) -> bool {
        self.0.is_nil()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Logical region (world/dimension) identifier used as the partition
/// key for persisted records.
///
/// Signed because host dimension keys can be negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RegionId(pub i32);

impl RegionId {
    /// Wrap a raw region key.
    pub const fn new(key: i32) -> Self {
        Self(key)
    }

    /// Return the raw region key.
    pub const fn into_inner(self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RegionId {
    fn from(key: i32) -> Self {
        Self(key)
    }
}

impl From<RegionId> for i32 {
    fn from(region: RegionId) -> Self {
        region.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_not_nil() {
        let id = EntityId::new();
        assert!(!id.is_nil());
        assert_ne!(id.into_inner(), Uuid::nil());
    }

    #[test]
    fn nil_uuid_is_flagged() {
        let id = EntityId::from(Uuid::nil());
        assert!(id.is_nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = EntityId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<EntityId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert!(restored.is_ok());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = EntityId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn region_display_matches_key() {
        assert_eq!(RegionId::new(-1).to_string(), "-1");
        assert_eq!(RegionId::new(7).into_inner(), 7);
    }
}
