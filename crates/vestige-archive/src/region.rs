//! Region-scoped archive files: one LZMA-compressed file per region.
//!
//! Every region gets its own directory under the archive root, holding
//! a single backing file with a fixed base name. Loading a region that
//! was never saved returns no records; saving always rewrites the file
//! wholesale, so callers supply the full desired content for that
//! region.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use vestige_types::{LifeRecord, RegionId};
use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

use crate::error::ArchiveError;
use crate::wire;

/// Default base name for a region's archive file.
pub const DEFAULT_FILE_NAME: &str = "vestige.dat";

/// LZMA preset used when writing archives.
const LZMA_PRESET: u32 = 6;

/// Durable storage for life records, laid out as one compressed file
/// per region under a host-supplied root directory.
///
/// The content of each file is a single LZMA-alone stream wrapping the
/// binary layout in [`wire`]. I/O is synchronous and may block on
/// device latency; hosts with a latency-sensitive step loop should
/// call [`RegionArchive::load`] and [`RegionArchive::save`] off that
/// loop and hand results back to the owning thread.
#[derive(Debug, Clone)]
pub struct RegionArchive {
    root: PathBuf,
    file_name: String,
}

impl RegionArchive {
    /// Create an archive rooted at `root`, using the default backing
    /// file name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_file_name(root, DEFAULT_FILE_NAME)
    }

    /// Create an archive rooted at `root` with a custom backing file
    /// name.
    pub fn with_file_name(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self { root: root.into(), file_name: file_name.into() }
    }

    /// The archive's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The backing file name used within each region directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Directory holding the given region's backing file.
    pub fn region_dir(&self, region: RegionId) -> PathBuf {
        self.root.join(format!("region-{}", region.into_inner()))
    }

    /// Full path of the given region's backing file.
    pub fn region_file(&self, region: RegionId) -> PathBuf {
        self.region_dir(region).join(&self.file_name)
    }

    /// Load every record persisted for `region`.
    ///
    /// A region with no backing file yields an empty list; that is the
    /// normal first use of a fresh region, not an error. A file that
    /// exists but cannot be decoded fails the whole call: truncation
    /// surfaces as an I/O read error, impossible declared values as
    /// [`ArchiveError::Corrupt`]. No partial content is returned.
    pub fn load(&self, region: RegionId) -> Result<Vec<LifeRecord>, ArchiveError> {
        let path = self.region_file(region);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(%region, path = %path.display(), "no archive file for region, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let stream = Stream::new_lzma_decoder(u64::MAX)?;
        let mut reader = XzDecoder::new_stream(BufReader::new(file), stream);
        let records = wire::read_stream(&mut reader)?;
        info!(%region, count = records.len(), "loaded records from region archive");
        Ok(records)
    }

    /// Persist `records` as the full content of `region`'s backing
    /// file, creating the region directory if needed and overwriting
    /// any prior content.
    ///
    /// The records are written in the given order. Overlay timeline
    /// entries are resolved to full snapshots on the way out. The
    /// whole stream is encoded and compressed in memory before the
    /// file is opened, so a record the wire format cannot carry
    /// ([`ArchiveError::LimitExceeded`]) or an unresolvable timeline
    /// fails the save with any existing file untouched. A failure
    /// while writing the opened file leaves no guarantee about its
    /// content.
    pub fn save(&self, region: RegionId, records: &[&LifeRecord]) -> Result<(), ArchiveError> {
        let options = LzmaOptions::new_preset(LZMA_PRESET)?;
        let stream = Stream::new_lzma_encoder(&options)?;
        let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
        wire::write_stream(&mut encoder, records)?;
        let compressed = encoder.finish()?;

        let dir = self.region_dir(region);
        fs::create_dir_all(&dir)?;
        let path = dir.join(&self.file_name);
        let mut file = File::create(&path)?;
        file.write_all(&compressed)?;
        file.sync_all()?;

        info!(%region, count = records.len(), path = %path.display(), "saved records to region archive");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;
    use vestige_types::{
        EntitySnapshot, ItemDescriptor, Orientation, Position, TimelineEntry, Vitality,
    };

    use super::*;

    fn snapshot_at(x: f64, z: f64) -> EntitySnapshot {
        EntitySnapshot::new(
            Position::new(x, 70.0, z),
            Orientation::new(0.0, 0.0),
            Some(ItemDescriptor::new("torch", 0)),
            vec![None, Some(ItemDescriptor::new("chainmail_chestplate", 1)), None, None],
            Vitality::new(20, 20.0),
        )
    }

    fn record_in(region: i32, name: &str) -> LifeRecord {
        let first = snapshot_at(0.0, 0.0);
        let second = snapshot_at(4.0, -2.0);
        LifeRecord::new(
            name.to_owned(),
            second.position,
            RegionId::new(region),
            vec![TimelineEntry::Snapshot(first), TimelineEntry::Snapshot(second)],
        )
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        assert_eq!(archive.load(RegionId::new(3)).unwrap(), Vec::new());
    }

    #[test]
    fn save_then_load_round_trips_field_for_field() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        let records = vec![record_in(0, "First"), record_in(0, "Second")];
        let refs: Vec<&LifeRecord> = records.iter().collect();

        archive.save(RegionId::new(0), &refs).unwrap();
        let loaded = archive.load(RegionId::new(0)).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn save_creates_the_region_directory() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path().join("deeper").join("root"));
        let record = record_in(-1, "Nether");

        archive.save(RegionId::new(-1), &[&record]).unwrap();
        assert!(archive.region_file(RegionId::new(-1)).is_file());
    }

    #[test]
    fn regions_use_distinct_files() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        assert_ne!(archive.region_file(RegionId::new(0)), archive.region_file(RegionId::new(1)));

        let overworld = record_in(0, "Overworld");
        let nether = record_in(-1, "Nether");
        archive.save(RegionId::new(0), &[&overworld]).unwrap();
        archive.save(RegionId::new(-1), &[&nether]).unwrap();

        assert_eq!(archive.load(RegionId::new(0)).unwrap(), vec![overworld]);
        assert_eq!(archive.load(RegionId::new(-1)).unwrap(), vec![nether]);
    }

    #[test]
    fn save_overwrites_prior_content() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        let first = record_in(0, "First");
        let replacement = record_in(0, "Replacement");

        archive.save(RegionId::new(0), &[&first]).unwrap();
        archive.save(RegionId::new(0), &[&replacement]).unwrap();

        assert_eq!(archive.load(RegionId::new(0)).unwrap(), vec![replacement]);
    }

    #[test]
    fn failed_save_leaves_prior_content_intact() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        let kept = record_in(0, "Keeper");
        archive.save(RegionId::new(0), &[&kept]).unwrap();

        let mut overlong = "e".repeat(wire::MAX_STRING_BYTES);
        overlong.push('e');
        let rejected = record_in(0, &overlong);
        let err = archive.save(RegionId::new(0), &[&rejected]).unwrap_err();
        assert!(matches!(err, ArchiveError::LimitExceeded { .. }), "got {err:?}");

        assert_eq!(archive.load(RegionId::new(0)).unwrap(), vec![kept]);
    }

    #[test]
    fn empty_record_list_round_trips() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());

        archive.save(RegionId::new(5), &[]).unwrap();
        assert_eq!(archive.load(RegionId::new(5)).unwrap(), Vec::new());
    }

    #[test]
    fn custom_file_name_is_respected() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::with_file_name(dir.path(), "final-moments.dat");
        let record = record_in(0, "Custom");

        archive.save(RegionId::new(0), &[&record]).unwrap();
        assert!(archive.region_file(RegionId::new(0)).ends_with("final-moments.dat"));
        assert_eq!(archive.load(RegionId::new(0)).unwrap(), vec![record]);
    }

    #[test]
    fn truncated_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        let record = record_in(0, "Cut short");
        archive.save(RegionId::new(0), &[&record]).unwrap();

        let path = archive.region_file(RegionId::new(0));
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, bytes.get(..bytes.len() / 2).unwrap()).unwrap();

        assert!(archive.load(RegionId::new(0)).is_err());
    }

    #[test]
    fn garbage_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let archive = RegionArchive::new(dir.path());
        let path = archive.region_file(RegionId::new(0));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"this is not an lzma stream").unwrap();

        assert!(archive.load(RegionId::new(0)).is_err());
    }
}
