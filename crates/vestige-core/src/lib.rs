//! Recording, storage, and playback of entity life traces.
//!
//! This crate owns the live side of the system: observing entities
//! step by step, finalizing their traces into records when they are
//! removed, holding finalized records partitioned by region, and
//! replaying stored records through a puppet.
//!
//! # Lifecycle
//!
//! ```text
//! Host step loop
//!     |
//!     +-- on_entity_step ------> TraceRecorder (live containers)
//!     |
//!     +-- on_entity_removed ---> RecordStore (finalized, by region)
//!     |
//!     +-- on_region_loaded <---- vestige-archive (one file per region)
//!     +-- on_region_saved -----> vestige-archive
//!     +-- on_region_unloaded --> save, then evict from the store
//! ```
//!
//! # Modules
//!
//! - [`buffer`] -- Bounded FIFO buffer that evicts its oldest entry
//!   when full.
//! - [`config`] -- Session configuration loaded from YAML.
//! - [`playback`] -- Replay cursor driving a [`Puppet`] through a
//!   stored record.
//! - [`recorder`] -- Per-entity snapshot recording and finalization.
//! - [`session`] -- The host-facing object tying recorder, store, and
//!   archive together.
//! - [`store`] -- In-memory record store partitioned by region.
//!
//! [`Puppet`]: playback::Puppet

pub mod buffer;
pub mod config;
pub mod playback;
pub mod recorder;
pub mod session;
pub mod store;

// Re-export primary types for convenience.
pub use buffer::EvictingBuffer;
pub use config::{ConfigError, SessionConfig};
pub use playback::{Playback, PlaybackError, Puppet};
pub use recorder::{RecorderError, TraceRecorder};
pub use session::{RecordingSession, SessionError};
pub use store::RecordStore;
