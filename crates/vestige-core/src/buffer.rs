//! A fixed-capacity FIFO buffer that evicts its oldest element when
//! full.
//!
//! The buffer is the one concurrency-tolerant piece of this workspace:
//! every method takes `&self` and serializes access through an internal
//! mutex, so multiple producer threads may `add` and `remove`
//! concurrently. Interleaving order under contention is
//! non-deterministic, but the capacity bound always holds once calls
//! quiesce.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A FIFO buffer that holds at most `capacity` elements, silently
/// discarding the oldest element to make room for a new one.
///
/// A capacity of zero accepts every `add` but retains nothing. An
/// unbounded buffer never evicts. Elements cannot be null by
/// construction, and a negative capacity is unrepresentable, so the
/// classic misuse cases are compile-time impossibilities rather than
/// runtime checks.
#[derive(Debug)]
pub struct EvictingBuffer<T> {
    items: Mutex<VecDeque<T>>,
    capacity: Option<usize>,
}

impl<T> EvictingBuffer<T> {
    /// Create a buffer that retains at most `capacity` elements.
    pub const fn bounded(capacity: usize) -> Self {
        Self { items: Mutex::new(VecDeque::new()), capacity: Some(capacity) }
    }

    /// Create a buffer that never evicts.
    pub const fn unbounded() -> Self {
        Self { items: Mutex::new(VecDeque::new()), capacity: None }
    }

    /// The retention bound, or `None` for an unbounded buffer.
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append an element, evicting the oldest one first when the
    /// buffer is at capacity.
    ///
    /// With capacity zero the element is discarded and the buffer
    /// stays empty; the call still counts as a success.
    pub fn add(&self, item: T) {
        let mut items = self.items.lock();
        match self.capacity {
            Some(0) => return,
            Some(capacity) => {
                if items.len() >= capacity {
                    items.pop_front();
                }
            }
            None => {}
        }
        items.push_back(item);
    }

    /// Number of elements currently retained.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the buffer currently retains nothing.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Copy the retained elements, oldest first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.lock().iter().cloned().collect()
    }

    /// Consume the buffer, yielding the retained elements oldest
    /// first.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_inner().into()
    }

    /// Whether an equal element is currently retained.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.lock().contains(item)
    }

    /// Remove the oldest element equal to `item`, reporting whether
    /// one was found.
    pub fn remove(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let mut items = self.items.lock();
        items.iter().position(|held| held == item).is_some_and(|index| {
            items.remove(index);
            true
        })
    }
}
