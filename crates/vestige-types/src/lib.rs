//! Shared type definitions for the vestige recording pipeline.
//!
//! This crate is the single source of truth for the data model shared
//! by the recorder, the in-memory store, and the archive codec:
//! per-step entity snapshots, compacted overlays between them, and the
//! finalized life records that get persisted per region.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe entity and region identifiers
//! - [`item`] -- Held/equipped item descriptors
//! - [`snapshot`] -- Per-step entity state captures and field groups
//! - [`overlay`] -- Field-wise deltas between adjacent snapshots
//! - [`record`] -- Finalized life records and timeline resolution
//! - [`error`] -- Timeline resolution errors

pub mod error;
pub mod ids;
pub mod item;
pub mod overlay;
pub mod record;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use error::TimelineError;
pub use ids::{EntityId, RegionId};
pub use item::ItemDescriptor;
pub use overlay::SnapshotOverlay;
pub use record::{LifeRecord, TimelineEntry};
pub use snapshot::{EQUIPMENT_SLOTS, EntitySnapshot, Orientation, Position, Vitality};
