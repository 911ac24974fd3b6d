//! Error types for the archive codec.
//!
//! All errors are propagated via [`ArchiveError`], which wraps the
//! underlying I/O and LZMA stream errors and adds the corruption cases
//! the wire decoder detects itself. A missing archive file is not an
//! error at all: loading a region that was never saved yields an empty
//! record list.

use thiserror::Error;
use vestige_types::TimelineError;

/// Errors that can occur while encoding, decoding, or storing region
/// archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Reading or writing a backing file failed.
    ///
    /// This covers storage failures (permissions, device errors, disk
    /// full) and also truncated streams, which surface as an
    /// unexpected-EOF read error. A save that fails while writing the
    /// file leaves no guarantee about its content.
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Constructing or running the LZMA filter failed.
    #[error("LZMA stream error: {0}")]
    Lzma(#[from] xz2::stream::Error),

    /// The stream declared something impossible: a negative count, a
    /// length beyond the documented decode limits, an invalid item
    /// present flag, or a non-UTF-8 string.
    ///
    /// Fatal to the load call; the partition should be treated as
    /// unrecoverable for the session rather than partially decoded.
    #[error("corrupt archive stream: {detail}")]
    Corrupt {
        /// What the decoder found and where it gave up.
        detail: String,
    },

    /// A length in the data being encoded exceeds the documented wire
    /// limits.
    ///
    /// The encoder enforces the same limits the decoder does, so input
    /// past them fails the save before anything reaches the file; a
    /// stream this crate wrote always decodes.
    #[error("{field} {value} exceeds wire limit {limit}")]
    LimitExceeded {
        /// Which length field was over.
        field: &'static str,
        /// The offending value.
        value: usize,
        /// The bound the wire format enforces.
        limit: usize,
    },

    /// A record's timeline could not be materialized for encoding.
    #[error("unresolvable record timeline: {0}")]
    Timeline(#[from] TimelineError),
}
