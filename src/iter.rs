//! Iterators over a [`SegmentedQueue`].

use crate::queue::SegmentedQueue;
use crate::segment::Segment;
use std::iter::FusedIterator;

/// Borrowing iterator, oldest to newest.
///
/// Created by [`SegmentedQueue::iter`]. Walks the chain from the tail
/// segment to the head segment, tracking the current segment and the offset
/// past its read cursor. The queue cannot be mutated while this is alive.
pub struct Iter<'a, T> {
    segment: Option<&'a Segment<T>>,
    offset: usize,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tail: &'a Segment<T>, len: usize) -> Self {
        Self {
            segment: Some(tail),
            offset: 0,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(segment) = self.segment {
            match segment.slot(self.offset) {
                Some(slot) => {
                    self.offset += 1;
                    if let Some(value) = slot {
                        self.remaining = self.remaining.saturating_sub(1);
                        return Some(value);
                    }
                }
                None => {
                    // SAFETY: the queue is borrowed for 'a, so every segment
                    // in its chain outlives this iterator.
                    self.segment = segment.next.map(|next| unsafe { &*next.as_ptr() });
                    self.offset = 0;
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            segment: self.segment,
            offset: self.offset,
            remaining: self.remaining,
        }
    }
}

/// Owning iterator that shifts values out of the queue.
///
/// Created by [`SegmentedQueue::into_iter`].
pub struct IntoIter<T> {
    queue: SegmentedQueue<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(queue: SegmentedQueue<T>) -> Self {
        Self { queue }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Draining iterator that shifts values out of a borrowed queue.
///
/// Created by [`SegmentedQueue::drain`]. Whatever is left when this is
/// dropped is shifted out and dropped too.
pub struct Drain<'a, T> {
    queue: &'a mut SegmentedQueue<T>,
}

impl<'a, T> Drain<'a, T> {
    pub(crate) fn new(queue: &'a mut SegmentedQueue<T>) -> Self {
        Self { queue }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        while self.queue.shift().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_queue(values: impl IntoIterator<Item = u32>) -> SegmentedQueue<u32> {
        let mut queue = SegmentedQueue::with_segment_capacity(4).unwrap();
        queue.extend(values);
        queue
    }

    #[test]
    fn test_iter_empty() {
        let queue = small_queue(std::iter::empty());
        assert_eq!(queue.iter().next(), None);
        assert_eq!(queue.iter().len(), 0);
    }

    #[test]
    fn test_iter_crosses_segments() {
        let queue = small_queue(0..10);
        assert_eq!(queue.segment_count(), 4);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_is_restartable() {
        let queue = small_queue(0..10);

        let first: Vec<_> = queue.iter().collect();
        let second: Vec<_> = queue.iter().collect();

        assert_eq!(first, second);
        assert_eq!(queue.len(), 10);
        assert!(!queue.is_empty());
    }

    #[test]
    fn test_iter_after_wrap() {
        let mut queue = small_queue(0..3);
        queue.shift();
        queue.shift();
        queue.push(3);
        queue.push(4);

        // Single segment whose storage has wrapped
        assert_eq!(queue.segment_count(), 1);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_iter_exact_size() {
        let queue = small_queue(0..7);
        let mut iter = queue.iter();

        assert_eq!(iter.len(), 7);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.by_ref().count(), 5);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_clone_resumes() {
        let queue = small_queue(0..5);
        let mut iter = queue.iter();
        iter.next();

        let rest: Vec<_> = iter.clone().copied().collect();
        assert_eq!(rest, vec![1, 2, 3, 4]);
        assert_eq!(iter.next(), Some(&1));
    }

    #[test]
    fn test_into_iter() {
        let queue = small_queue(0..10);
        let values: Vec<_> = queue.into_iter().collect();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_ref_into_iter() {
        let queue = small_queue(0..4);
        let mut sum = 0;
        for value in &queue {
            sum += value;
        }
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_drain_partial() {
        let mut queue = small_queue(0..10);

        {
            let mut drain = queue.drain();
            assert_eq!(drain.next(), Some(0));
            assert_eq!(drain.next(), Some(1));
        }

        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.segment_count(), 1);
    }
}
