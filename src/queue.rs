//! Segmented FIFO queue.
//!
//! # Chain Structure
//!
//! The queue is a singly-linked chain of fixed-size [`Segment`]s:
//!
//! ```text
//!  tail (oldest, serving shift)                     head (newest, serving push)
//!    |                                                   |
//!    v                                                   v
//! +-----------+   next   +-----------+   next   +-----------+
//! |  segment  | -------> |  segment  | -------> |  segment  | ---> None
//! +-----------+          +-----------+          +-----------+
//! ```
//!
//! - `push` writes into the head. A full head gets a fresh segment linked
//!   after it, which becomes the new head.
//! - `shift` reads from the tail. Once the tail is drained and a newer
//!   segment exists, the tail is unlinked and freed on the spot.
//! - `unshift` writes in front of the tail. A full tail gets a fresh segment
//!   linked before it, which becomes the new tail.
//!
//! The head segment is never freed, so the chain always holds at least one
//! segment.

use crate::error::{QueueResult, validate_capacity};
use crate::iter::{Drain, IntoIter, Iter};
use crate::segment::{DEFAULT_SEGMENT_CAPACITY, Segment};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use tracing::{debug, trace};

/// A FIFO queue backed by a chain of fixed-size ring buffers.
///
/// Growth and shrinkage happen one segment at a time, so sustained
/// push/shift cycles never copy the whole queue and never allocate per item.
///
/// # Example
///
/// ```
/// use segqueue::SegmentedQueue;
///
/// let mut queue = SegmentedQueue::new();
/// queue.push(1);
/// queue.push(2);
/// queue.unshift(0);
///
/// assert_eq!(queue.len(), 3);
/// assert_eq!(queue.shift(), Some(0));
/// assert_eq!(queue.shift(), Some(1));
/// assert_eq!(queue.shift(), Some(2));
/// assert_eq!(queue.shift(), None);
/// ```
pub struct SegmentedQueue<T> {
    /// Oldest segment. Reads come from here.
    tail: NonNull<Segment<T>>,
    /// Newest segment. Writes go here. Equal to `tail` with a single segment.
    head: NonNull<Segment<T>>,
    /// Live payloads across all segments.
    len: usize,
    /// Segments currently in the chain.
    segments: usize,
    /// Slots per segment.
    capacity: usize,
    /// The queue owns every segment in the chain.
    _marker: PhantomData<Box<Segment<T>>>,
}

// SAFETY: the queue exclusively owns its segments and their payloads, just
// like a `Vec<T>` would.
unsafe impl<T: Send> Send for SegmentedQueue<T> {}

// SAFETY: shared access never mutates the chain.
unsafe impl<T: Sync> Sync for SegmentedQueue<T> {}

impl<T> SegmentedQueue<T> {
    /// Create an empty queue with the default segment capacity (2048).
    pub fn new() -> Self {
        Self::from_capacity(DEFAULT_SEGMENT_CAPACITY)
    }

    /// Create an empty queue with a custom segment capacity.
    ///
    /// Returns an error if `capacity` is not a power of two or is below 2.
    pub fn with_segment_capacity(capacity: usize) -> QueueResult<Self> {
        validate_capacity(capacity).map(Self::from_capacity)
    }

    /// Create a new builder for this payload type.
    pub fn builder() -> QueueBuilder<T> {
        QueueBuilder::new()
    }

    fn from_capacity(capacity: usize) -> Self {
        let segment = alloc_segment(capacity);
        Self {
            tail: segment,
            head: segment,
            len: 0,
            segments: 1,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Number of payloads in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no payloads are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tail().is_empty()
    }

    /// Slots per segment, including the reserved slot.
    #[inline]
    pub fn segment_capacity(&self) -> usize {
        self.capacity
    }

    /// Segments currently in the chain. Always at least 1.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Append a value at the back of the queue.
    pub fn push(&mut self, value: T) {
        self.len += 1;

        if self.head().is_full() {
            let segment = alloc_segment(self.capacity);
            self.head_mut().next = Some(segment);
            self.head = segment;
            self.segments += 1;

            trace!(segments = self.segments, "linked new head segment");
        }

        self.head_mut().push(value);
    }

    /// Insert a value at the front of the queue.
    ///
    /// The value is the next one returned by [`shift`](Self::shift). This is
    /// how a consumer hands back an item it decided not to process yet.
    pub fn unshift(&mut self, value: T) {
        self.len += 1;

        if self.tail().is_full() {
            let mut segment = alloc_segment(self.capacity);
            // SAFETY: the segment was just allocated and is not yet shared.
            unsafe { segment.as_mut() }.next = Some(self.tail);
            self.tail = segment;
            self.segments += 1;

            trace!(segments = self.segments, "linked new tail segment");
        }

        self.tail_mut().unshift(value);
    }

    /// Remove and return the value at the front of the queue.
    ///
    /// Returns `None` if the queue is empty.
    pub fn shift(&mut self) -> Option<T> {
        let tail = self.tail_mut();
        let value = tail.shift();

        if tail.is_empty()
            && let Some(next) = tail.next.take()
        {
            let drained = std::mem::replace(&mut self.tail, next);
            // SAFETY: `drained` had a successor so it is not the head, and it
            // is no longer reachable from the chain.
            unsafe { free_segment(drained) };
            self.segments -= 1;

            trace!(segments = self.segments, "released drained tail segment");
        }

        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    /// Borrow the value at the front of the queue.
    pub fn peek(&self) -> Option<&T> {
        self.tail().peek()
    }

    /// Iterate from oldest to newest without removing anything.
    ///
    /// Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.tail(), self.len)
    }

    /// Remove every value, oldest first.
    ///
    /// Values not consumed by the time the iterator is dropped are removed
    /// anyway.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self)
    }

    /// True if `predicate` holds for every value (vacuously true when empty).
    ///
    /// Stops at the first value that fails.
    pub fn every<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(predicate)
    }

    /// The oldest value satisfying `predicate`, or `None`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|value| predicate(*value))
    }

    /// Drop every value and shrink back to a single empty segment.
    pub fn clear(&mut self) {
        debug!(len = self.len, segments = self.segments, "clearing queue");
        self.reset();
    }

    /// Sort the queue in ascending order.
    pub fn sort(&mut self) -> &mut Self
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    /// Sort the queue by a key extraction function.
    pub fn sort_by_key<K, F>(&mut self, mut f: F) -> &mut Self
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(|a, b| f(a).cmp(&f(b)))
    }

    /// Sort the queue with a comparator.
    ///
    /// The queue is drained into a temporary buffer, rebuilt as a single
    /// segment, and refilled in sorted order. The sort is stable. If the
    /// comparator panics the queue is left empty.
    pub fn sort_by<F>(&mut self, compare: F) -> &mut Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut values = self.take_all();
        values.sort_by(compare);
        self.extend(values);
        self
    }

    /// Sort the queue with a fallible comparator.
    ///
    /// On the first comparator error the drained values are dropped, the
    /// queue is left empty, and the error is returned.
    pub fn try_sort_by<F, E>(&mut self, mut compare: F) -> Result<&mut Self, E>
    where
        F: FnMut(&T, &T) -> Result<Ordering, E>,
    {
        let mut values = self.take_all();
        let mut failure = None;

        values.sort_by(|a, b| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            match compare(a, b) {
                Ok(ordering) => ordering,
                Err(e) => {
                    failure = Some(e);
                    Ordering::Equal
                }
            }
        });

        if let Some(e) = failure {
            debug!(dropped = values.len(), "comparator failed, queue left empty");
            return Err(e);
        }

        self.extend(values);
        Ok(self)
    }

    /// Shift every value into a buffer and reset the chain.
    fn take_all(&mut self) -> Vec<T> {
        let len = self.len;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            match self.shift() {
                Some(value) => values.push(value),
                None => break,
            }
        }

        debug!(len, segments = self.segments, "drained queue for sort");
        self.reset();
        values
    }

    /// Free the whole chain and start over with one empty segment.
    ///
    /// The old chain is detached before any payload is dropped, so a
    /// panicking `Drop` leaves the queue empty and usable.
    fn reset(&mut self) {
        let segment = alloc_segment(self.capacity);
        let chain = std::mem::replace(&mut self.tail, segment);
        self.head = segment;
        self.len = 0;
        self.segments = 1;

        // SAFETY: the old chain is no longer reachable from the queue.
        unsafe { free_chain(chain) };
    }

    #[inline]
    fn tail(&self) -> &Segment<T> {
        // SAFETY: tail always points to a live segment owned by this queue.
        unsafe { self.tail.as_ref() }
    }

    #[inline]
    fn tail_mut(&mut self) -> &mut Segment<T> {
        // SAFETY: tail always points to a live segment owned by this queue,
        // and `&mut self` guarantees exclusive access.
        unsafe { self.tail.as_mut() }
    }

    #[inline]
    fn head(&self) -> &Segment<T> {
        // SAFETY: head always points to a live segment owned by this queue.
        unsafe { self.head.as_ref() }
    }

    #[inline]
    fn head_mut(&mut self) -> &mut Segment<T> {
        // SAFETY: head always points to a live segment owned by this queue,
        // and `&mut self` guarantees exclusive access.
        unsafe { self.head.as_mut() }
    }
}

fn alloc_segment<T>(capacity: usize) -> NonNull<Segment<T>> {
    NonNull::from(Box::leak(Box::new(Segment::with_capacity(capacity))))
}

/// # Safety
///
/// `segment` must come from `alloc_segment`, be unlinked from any chain, and
/// not be used again.
unsafe fn free_segment<T>(segment: NonNull<Segment<T>>) {
    // SAFETY: upheld by the caller.
    drop(unsafe { Box::from_raw(segment.as_ptr()) });
}

/// Free every segment from `tail` onwards.
///
/// If a payload panics while being dropped, the remaining segments are still
/// freed during the unwind. A second panic aborts.
///
/// # Safety
///
/// `tail` must start a chain built by `alloc_segment` that nothing else can
/// reach, and none of its segments may be used again.
unsafe fn free_chain<T>(tail: NonNull<Segment<T>>) {
    let mut cursor = Some(tail);
    // SAFETY: upheld by the caller.
    unsafe { release_from(&mut cursor) };
}

/// Finishes freeing a chain when dropping a segment unwinds.
struct ChainGuard<T> {
    cursor: Option<NonNull<Segment<T>>>,
}

impl<T> Drop for ChainGuard<T> {
    fn drop(&mut self) {
        // SAFETY: the cursor points at the unreleased rest of a detached chain.
        unsafe { release_from(&mut self.cursor) };
    }
}

/// # Safety
///
/// Same contract as [`free_chain`].
unsafe fn release_from<T>(cursor: &mut Option<NonNull<Segment<T>>>) {
    while let Some(segment) = *cursor {
        // SAFETY: each segment is owned by the chain and visited once.
        let mut segment = unsafe { Box::from_raw(segment.as_ptr()) };
        *cursor = segment.next.take();

        let guard = ChainGuard { cursor: *cursor };
        drop(segment);
        std::mem::forget(guard);
    }
}

impl<T> Drop for SegmentedQueue<T> {
    fn drop(&mut self) {
        // SAFETY: the queue is never used again.
        unsafe { free_chain(self.tail) };
    }
}

impl<T> Default for SegmentedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SegmentedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for SegmentedQueue<T> {
    fn clone(&self) -> Self {
        let mut queue = Self::from_capacity(self.capacity);
        queue.extend(self.iter().cloned());
        queue
    }
}

impl<T: PartialEq> PartialEq for SegmentedQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SegmentedQueue<T> {}

impl<T> Extend<T> for SegmentedQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for SegmentedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T> IntoIterator for SegmentedQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a SegmentedQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Builder for [`SegmentedQueue`].
///
/// The payload type is fixed by the builder, so `build()` needs no
/// annotations when the target type is known.
///
/// # Example
///
/// ```
/// use segqueue::QueueBuilder;
///
/// let queue = QueueBuilder::<u32>::new()
///     .segment_capacity(64)
///     .build()
///     .expect("failed to build queue");
///
/// assert_eq!(queue.segment_capacity(), 64);
/// ```
pub struct QueueBuilder<T> {
    /// Slots per segment.
    segment_capacity: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for QueueBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for QueueBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            segment_capacity: self.segment_capacity,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for QueueBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueBuilder")
            .field("segment_capacity", &self.segment_capacity)
            .finish()
    }
}

impl<T> QueueBuilder<T> {
    /// Create a new builder with the default segment capacity (2048).
    pub fn new() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            _marker: PhantomData,
        }
    }

    /// Set the number of slots per segment.
    ///
    /// Must be a power of two and at least 2. Each segment holds one fewer
    /// payload than its capacity.
    pub fn segment_capacity(mut self, capacity: usize) -> Self {
        self.segment_capacity = capacity;
        self
    }

    /// Build the queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if the segment capacity is not
    /// a power of two or is below 2.
    ///
    /// [`QueueError::InvalidCapacity`]: crate::QueueError::InvalidCapacity
    pub fn build(self) -> QueueResult<SegmentedQueue<T>> {
        SegmentedQueue::with_segment_capacity(self.segment_capacity)
    }
}
