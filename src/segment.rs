//! Fixed-capacity ring buffer segment.
//!
//! A segment is a circular buffer of `capacity` slots with independent read
//! and write cursors. Cursors wrap by masking with `capacity - 1`, so the
//! capacity is always a power of two.
//!
//! ```text
//!        read                write
//!         |                    |
//!         v                    v
//! +------+------+------+------+------+------+
//! | None | item | item | item | None | None |
//! +------+------+------+------+------+------+
//! ```
//!
//! When `write == read` the segment is empty and when `write + 1 == read`
//! (modulo capacity) it is full. This wastes a single slot but avoids a
//! separate counter.

use crate::error::{QueueResult, validate_capacity};
use crate::metrics::{SEGMENT_ALLOC, SEGMENT_CURRENT, SEGMENT_FREE};
use std::ptr::NonNull;

/// Default number of slots per segment.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 2048;

/// A fixed-capacity circular buffer.
///
/// This is the low-level building block of [`SegmentedQueue`]. The queue
/// checks [`is_full`](Segment::is_full) before every insert; callers using a
/// segment directly must do the same. Inserting into a full segment
/// overwrites unread data (a debug assertion catches this in debug builds).
///
/// [`SegmentedQueue`]: crate::SegmentedQueue
pub struct Segment<T> {
    /// Slot storage. `None` marks an empty slot.
    slots: Box<[Option<T>]>,
    /// Index of the next slot to read.
    read: usize,
    /// Index of the next slot to write.
    write: usize,
    /// Mask for wrapping cursors (capacity - 1).
    mask: usize,
    /// Next (newer) segment in the owning queue's chain.
    pub(crate) next: Option<NonNull<Segment<T>>>,
}

impl<T> Segment<T> {
    /// Create a new empty segment.
    ///
    /// Returns an error if `capacity` is not a power of two or is below 2.
    pub fn new(capacity: usize) -> QueueResult<Self> {
        validate_capacity(capacity).map(Self::with_capacity)
    }

    /// Create a segment from an already validated capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity >= 2 && capacity.is_power_of_two());

        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>();

        SEGMENT_ALLOC.increment();
        SEGMENT_CURRENT.increment();

        Self {
            slots: slots.into_boxed_slice(),
            read: 0,
            write: 0,
            mask: capacity - 1,
            next: None,
        }
    }

    /// Number of slots, including the reserved one.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live payloads between the read and write cursors.
    #[inline]
    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read) & self.mask
    }

    /// True when the read and write cursors meet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// True when one more write would reach the read cursor.
    #[inline]
    pub fn is_full(&self) -> bool {
        ((self.write + 1) & self.mask) == self.read
    }

    /// Store a value at the write cursor and advance it.
    #[inline]
    pub fn push(&mut self, value: T) {
        debug_assert!(!self.is_full(), "push into a full segment");

        self.slots[self.write] = Some(value);
        self.write = (self.write + 1) & self.mask;
    }

    /// Step the read cursor back and store a value there.
    ///
    /// The value becomes the next one returned by [`shift`](Segment::shift).
    #[inline]
    pub fn unshift(&mut self, value: T) {
        debug_assert!(!self.is_full(), "unshift into a full segment");

        self.read = (self.read + self.mask) & self.mask;
        self.slots[self.read] = Some(value);
    }

    /// Take the value at the read cursor.
    ///
    /// Returns `None` without moving the cursor if the slot is empty, so this
    /// is safe to call on an empty segment.
    #[inline]
    pub fn shift(&mut self) -> Option<T> {
        let value = self.slots[self.read].take();
        if value.is_some() {
            self.read = (self.read + 1) & self.mask;
        }
        value
    }

    /// Borrow the value at the read cursor.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.slots[self.read].as_ref()
    }

    /// Borrow the slot `offset` positions past the read cursor.
    ///
    /// Returns `None` once `offset` reaches [`len`](Segment::len).
    #[inline]
    pub(crate) fn slot(&self, offset: usize) -> Option<&Option<T>> {
        if offset < self.len() {
            Some(&self.slots[(self.read + offset) & self.mask])
        } else {
            None
        }
    }

    /// Every slot in storage order, empty ones included.
    pub fn slots(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Live payloads from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len())
            .filter_map(move |offset| self.slots[(self.read + offset) & self.mask].as_ref())
    }
}

impl<T> Drop for Segment<T> {
    fn drop(&mut self) {
        SEGMENT_FREE.increment();
        SEGMENT_CURRENT.decrement();
    }
}
