//! Persistence layer for vestige life records.
//!
//! Records are grouped by region and stored as one LZMA-compressed
//! file per region under a host-supplied root directory. The binary
//! layout inside the compressed stream is fixed-shape: big-endian
//! fixed-width numbers and length-prefixed UTF-8 strings, a record
//! count followed by that many records.
//!
//! # Data flow
//!
//! ```text
//! RecordStore (in memory)
//!     |
//!     +-- save(region, records) --> region-<key>/vestige.dat
//!     |       wire encode -> LZMA encode -> fsync
//!     |
//!     +-- load(region) <------------ region-<key>/vestige.dat
//!             LZMA decode -> wire decode (missing file => no records)
//! ```
//!
//! # Modules
//!
//! - [`region`] -- Per-region archive files and their layout on disk
//! - [`wire`] -- The fixed binary wire format and its shared limits
//! - [`error`] -- Shared error types

pub mod error;
pub mod region;
pub mod wire;

// Re-export primary types for convenience.
pub use error::ArchiveError;
pub use region::{DEFAULT_FILE_NAME, RegionArchive};
