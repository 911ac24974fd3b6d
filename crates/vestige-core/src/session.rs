//! The host-facing recording session.
//!
//! [`RecordingSession`] wires the recorder, the in-memory store, and
//! the on-disk archive into one object the host drives from its event
//! hooks: step, removal, region load, region save, region unload. The
//! host owns exactly one session per storage root and calls it from
//! its step loop; `&mut self` on the mutating hooks keeps that
//! single-owner contract checked by the compiler.

use std::path::PathBuf;

use tracing::debug;
use vestige_archive::{ArchiveError, RegionArchive};
use vestige_types::{EntityId, EntitySnapshot, RegionId};

use crate::config::SessionConfig;
use crate::recorder::{RecorderError, TraceRecorder};
use crate::store::RecordStore;

/// Errors that can occur while driving a recording session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The recorder rejected an observation or finalization.
    #[error("recorder error: {source}")]
    Recorder {
        /// The underlying recorder error.
        #[from]
        source: RecorderError,
    },

    /// Loading or saving a region archive failed.
    #[error("archive error: {source}")]
    Archive {
        /// The underlying archive error.
        #[from]
        source: ArchiveError,
    },
}

/// Drives recording across the whole host lifecycle.
///
/// Finalized records accumulate in the store partitioned by region;
/// region save events flush the matching partition to disk and region
/// unload events flush it and then drop it from memory.
#[derive(Debug)]
pub struct RecordingSession {
    recorder: TraceRecorder,
    store: RecordStore,
    archive: RegionArchive,
}

impl RecordingSession {
    /// Create a session with default settings rooted at `storage_root`.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self::with_config(storage_root, &SessionConfig::default())
    }

    /// Create a session configured by `config`.
    pub fn with_config(storage_root: impl Into<PathBuf>, config: &SessionConfig) -> Self {
        Self {
            recorder: TraceRecorder::with_settings(config.compact_overlays, config.history_limit),
            store: RecordStore::new(),
            archive: RegionArchive::with_file_name(storage_root, config.archive_file_name.clone()),
        }
    }

    /// Record one step of a live entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity identity is nil.
    pub fn on_entity_step(
        &mut self,
        entity: EntityId,
        label: &str,
        region: RegionId,
        snapshot: EntitySnapshot,
    ) -> Result<(), SessionError> {
        self.recorder.observe(entity, label, region, snapshot)?;
        Ok(())
    }

    /// Finalize a removed entity's trace into the store.
    ///
    /// Returns the region the record was filed under, or `None` when
    /// the entity was never observed (a removal the session simply has
    /// nothing to say about).
    ///
    /// # Errors
    ///
    /// Returns an error if the entity identity is nil.
    pub fn on_entity_removed(
        &mut self,
        entity: EntityId,
    ) -> Result<Option<RegionId>, SessionError> {
        match self.recorder.finalize(entity) {
            Ok(record) => {
                let region = record.region();
                debug!(
                    name = %record.name(),
                    origin = %record.origin(),
                    %region,
                    states = record.len(),
                    "life record captured"
                );
                self.store.add(record);
                Ok(Some(region))
            }
            Err(RecorderError::UnknownEntity { entity }) => {
                debug!(%entity, "removal of untracked entity ignored");
                Ok(None)
            }
            Err(source) => Err(source.into()),
        }
    }

    /// Bring a region's archived records into the store.
    ///
    /// Returns the number of records loaded; a region with no archive
    /// file contributes zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive file exists but cannot be read
    /// or decoded.
    pub fn on_region_loaded(&mut self, region: RegionId) -> Result<usize, SessionError> {
        let records = self.archive.load(region)?;
        let count = records.len();
        self.store.extend(records);
        Ok(count)
    }

    /// Flush a region's records to disk, keeping them in the store.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    pub fn on_region_saved(&self, region: RegionId) -> Result<usize, SessionError> {
        let records = self.store.by_region(region);
        self.archive.save(region, &records)?;
        Ok(records.len())
    }

    /// Flush a region's records to disk and drop them from the store.
    ///
    /// The save happens first; if it fails the records stay in memory
    /// so nothing is lost. Returns the number of records evicted.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    pub fn on_region_unloaded(&mut self, region: RegionId) -> Result<usize, SessionError> {
        let records = self.store.by_region(region);
        self.archive.save(region, &records)?;
        let drained = self.store.drain_region(region);
        debug!(%region, evicted = drained.len(), "region records evicted after save");
        Ok(drained.len())
    }

    /// Flush every region currently represented in the store.
    ///
    /// Returns the total number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error on the first region whose archive cannot be
    /// written; earlier regions stay saved.
    pub fn save_all(&self) -> Result<usize, SessionError> {
        let mut saved = 0usize;
        for region in self.store.regions() {
            saved = saved.saturating_add(self.on_region_saved(region)?);
        }
        Ok(saved)
    }

    /// The in-memory record store.
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The per-entity recorder.
    pub const fn recorder(&self) -> &TraceRecorder {
        &self.recorder
    }

    /// The on-disk archive.
    pub const fn archive(&self) -> &RegionArchive {
        &self.archive
    }
}
