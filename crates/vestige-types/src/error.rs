//! Error types for timeline resolution.

use thiserror::Error;

/// Errors raised while materializing a record's timeline into full
/// snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// An overlay appeared with no preceding snapshot to apply it to.
    ///
    /// Overlays describe a change relative to the previous state;
    /// without one there is nothing valid to reconstruct from, and
    /// falling back to a zero sentinel base would fabricate state. The
    /// recorder always seeds a timeline with a full snapshot, so this
    /// only arises from hand-built or damaged data.
    #[error("timeline entry {index} is an overlay with no preceding snapshot")]
    OverlayWithoutBase {
        /// Position of the offending entry within the timeline.
        index: usize,
    },
}
