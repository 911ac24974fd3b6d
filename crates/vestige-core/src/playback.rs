//! Replaying a finalized record through a passive puppet.
//!
//! A [`Playback`] cursor materializes a record's timeline up front and
//! hands out one snapshot per step, oldest first. The visual side is
//! behind the [`Puppet`] trait: a deliberately narrow capability set
//! (apply a state, retire) rather than a full simulated entity, so a
//! replay actor cannot take damage, persist, or interact by
//! construction.

use std::collections::VecDeque;

use thiserror::Error;
use vestige_types::{EntitySnapshot, LifeRecord, Position, TimelineError};

/// Errors raised when preparing a record for replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The record's timeline could not be materialized.
    #[error("record timeline cannot be replayed: {0}")]
    Timeline(#[from] TimelineError),
}

/// The capability set a replay actor exposes.
///
/// Implementors are expected to be passive: apply the given state to
/// their visual representation and disappear when retired. Nothing
/// else about them is driven from here.
pub trait Puppet {
    /// Apply one snapshot's fields onto the actor.
    fn apply_state(&mut self, state: &EntitySnapshot);

    /// Remove the actor; the sequence is exhausted.
    fn retire(&mut self);
}

/// A cursor over a record's snapshot sequence, oldest first.
#[derive(Debug, Clone)]
pub struct Playback {
    name: String,
    origin: Position,
    states: VecDeque<EntitySnapshot>,
    retired: bool,
}

impl Playback {
    /// Prepare a record for replay, materializing overlays into full
    /// snapshots.
    pub fn new(record: &LifeRecord) -> Result<Self, PlaybackError> {
        let states = record.resolve()?;
        Ok(Self {
            name: record.name().to_owned(),
            origin: record.origin(),
            states: states.into(),
            retired: false,
        })
    }

    /// Display label of the recorded entity, for naming the puppet.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the record is anchored; the natural spawn point for the
    /// puppet.
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Snapshots not yet handed out.
    pub fn remaining(&self) -> usize {
        self.states.len()
    }

    /// Whether every snapshot has been handed out.
    pub fn is_finished(&self) -> bool {
        self.states.is_empty()
    }

    /// Pop the oldest remaining snapshot.
    pub fn next_state(&mut self) -> Option<EntitySnapshot> {
        self.states.pop_front()
    }

    /// Advance one step: apply the oldest remaining snapshot to
    /// `puppet`, or retire it if the sequence is exhausted.
    ///
    /// Returns `true` while a state was applied. The first call after
    /// exhaustion retires the puppet and returns `false`; further
    /// calls return `false` without touching the puppet again.
    pub fn drive(&mut self, puppet: &mut impl Puppet) -> bool {
        if let Some(state) = self.states.pop_front() {
            puppet.apply_state(&state);
            return true;
        }
        if !self.retired {
            self.retired = true;
            puppet.retire();
        }
        false
    }
}
