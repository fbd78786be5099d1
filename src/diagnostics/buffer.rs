// SPDX-License-Identifier: MPL-2.0
//! Circular buffer implementation for diagnostic event storage.
//!
//! This module provides a memory-bounded ring buffer that automatically
//! evicts the oldest entries when capacity is reached.

use std::collections::VecDeque;

/// Valid range of the diagnostics buffer capacity.
pub mod buffer_capacity_bounds {
    use crate::app::config;

    pub const MIN: usize = config::MIN_DIAGNOSTICS_BUFFER_CAPACITY;
    pub const MAX: usize = config::MAX_DIAGNOSTICS_BUFFER_CAPACITY;
    pub const DEFAULT: usize = config::DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY;
}

/// Number of events the diagnostics buffer retains, clamped to
/// [`buffer_capacity_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a capacity, clamping out-of-range values.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

/// A generic circular buffer with fixed capacity.
///
/// When the buffer is full, pushing a new element evicts the oldest one.
/// Elements are stored in chronological order (oldest first).
///
/// # Example
///
/// ```
/// use mosaic_lens::diagnostics::{BufferCapacity, CircularBuffer};
///
/// let mut buffer: CircularBuffer<i32> = CircularBuffer::new(BufferCapacity::default());
/// buffer.push(1);
/// buffer.push(2);
///
/// let items: Vec<_> = buffer.iter().copied().collect();
/// assert_eq!(items, vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Creates a buffer with an unchecked capacity (at least one).
    ///
    /// Tests use this for small capacities.
    #[must_use]
    pub fn with_raw_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes an element, evicting the oldest one when full.
    pub fn push(&mut self, item: T) {
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(BufferCapacity::new(0).value(), buffer_capacity_bounds::MIN);
        assert_eq!(BufferCapacity::new(1_000_000).value(), buffer_capacity_bounds::MAX);
        assert_eq!(BufferCapacity::new(500).value(), 500);
        assert_eq!(BufferCapacity::default().value(), buffer_capacity_bounds::DEFAULT);
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut buffer = CircularBuffer::with_raw_capacity(3);
        for i in 0..5 {
            buffer.push(i);
        }
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn zero_raw_capacity_keeps_one_entry() {
        let mut buffer = CircularBuffer::with_raw_capacity(0);
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn clear_keeps_the_capacity() {
        let mut buffer = CircularBuffer::with_raw_capacity(2);
        buffer.push(1);
        buffer.push(2);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);

        buffer.push(3);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3]);
    }
}
