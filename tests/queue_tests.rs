//! Queue behavior tests.
//!
//! These tests drive `SegmentedQueue` through its public API only, with both
//! the default segment size and tiny segments that force frequent growth and
//! reclamation.

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use segqueue::{DEFAULT_SEGMENT_CAPACITY, SegmentedQueue};
use std::cmp::Ordering;

/// Create a queue whose segments hold `payloads` items each.
fn queue_with_payloads<T>(payloads: usize) -> SegmentedQueue<T> {
    SegmentedQueue::with_segment_capacity(payloads + 1).expect("Failed to create queue")
}

// =============================================================================
// FIFO Order and Length
// =============================================================================

#[test]
fn test_shift_small_queue() {
    let mut queue = SegmentedQueue::new();
    queue.push(1);
    queue.push(2);
    queue.push(3);

    assert_eq!(queue.shift(), Some(1));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.shift(), Some(2));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.shift(), Some(3));
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.shift(), None);
    assert_eq!(queue.len(), 0);
}

#[test]
fn test_shift_large_queue() {
    const MAX: u32 = 3_000;

    let mut queue = SegmentedQueue::new();
    for i in 0..MAX {
        queue.push(i);
    }
    assert_eq!(queue.len(), MAX as usize);

    for i in 0..MAX {
        assert_eq!(queue.shift(), Some(i));
    }
    assert_eq!(queue.shift(), None);
    assert_eq!(queue.segment_count(), 1);
}

#[test]
fn test_capacity_plus_one() {
    let mut queue = SegmentedQueue::new();
    assert_eq!(queue.segment_capacity(), DEFAULT_SEGMENT_CAPACITY);

    // One more than a segment's slot count
    let count = DEFAULT_SEGMENT_CAPACITY + 1;
    for i in 0..count {
        queue.push(i);
    }
    assert_eq!(queue.len(), count);
    assert_eq!(queue.segment_count(), 2);

    for i in 0..count {
        assert_eq!(queue.shift(), Some(i));
    }
    assert!(queue.is_empty());
}

#[test]
fn test_shift_empty_queue() {
    let mut queue: SegmentedQueue<String> = SegmentedQueue::new();

    for _ in 0..3 {
        assert_eq!(queue.shift(), None);
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
    }
}

#[test]
fn test_length_accounting() {
    let mut queue = queue_with_payloads(3);
    let mut pushed = 0usize;
    let mut shifted = 0usize;

    for i in 0..100 {
        queue.push(i);
        pushed += 1;
        if i % 3 == 0 {
            queue.unshift(i);
            pushed += 1;
        }
        if i % 2 == 0 && queue.shift().is_some() {
            shifted += 1;
        }
        assert_eq!(queue.len(), pushed - shifted);
    }
}

// =============================================================================
// Unshift
// =============================================================================

#[test]
fn test_unshift_then_shift() {
    let mut queue = SegmentedQueue::new();
    for i in 0..10 {
        queue.push(i);
    }

    queue.unshift(99);
    assert_eq!(queue.shift(), Some(99));
    assert_eq!(queue.shift(), Some(0));
}

#[test]
fn test_unshift_on_full_tail() {
    let mut queue = queue_with_payloads(3);
    queue.push(1);
    queue.push(2);
    queue.push(3);
    assert_eq!(queue.segment_count(), 1);

    queue.unshift(0);
    assert_eq!(queue.segment_count(), 2);
    assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn test_deferred_item_returns_to_front() {
    // A consumer takes an item, decides not to run it yet, and puts it back.
    let mut queue = queue_with_payloads(7);
    for i in 0..20 {
        queue.push(i);
    }

    let deferred = queue.shift().unwrap();
    let next = queue.shift().unwrap();
    queue.unshift(deferred);

    assert_eq!(next, 1);
    assert_eq!(queue.shift(), Some(0));
    assert_eq!(queue.shift(), Some(2));
}

// =============================================================================
// Model-based Churn
// =============================================================================

#[test]
fn test_matches_vecdeque_model() {
    use std::collections::VecDeque;

    for payloads in [1, 3, 7, 2047] {
        let mut queue = queue_with_payloads(payloads);
        let mut model = VecDeque::new();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(payloads as u64);

        for step in 0..20_000u64 {
            match rng.random_range(0..10u8) {
                0..=3 => {
                    queue.push(step);
                    model.push_back(step);
                }
                4 => {
                    queue.unshift(step);
                    model.push_front(step);
                }
                _ => {
                    assert_eq!(queue.shift(), model.pop_front());
                }
            }
            assert_eq!(queue.len(), model.len());
            assert_eq!(queue.is_empty(), model.is_empty());
        }

        assert!(queue.iter().eq(model.iter()));
    }
}

#[test]
fn test_sustained_cycles_keep_chain_small() {
    let mut queue = queue_with_payloads(15);

    for round in 0..1_000u32 {
        for i in 0..40 {
            queue.push(round * 40 + i);
        }
        for i in 0..40 {
            assert_eq!(queue.shift(), Some(round * 40 + i));
        }
        assert_eq!(queue.segment_count(), 1);
    }
}

// =============================================================================
// Iteration
// =============================================================================

#[test]
fn test_iterable_small_queue() {
    let mut queue = SegmentedQueue::new();
    queue.push(1);
    queue.push(2);
    queue.push(3);

    let result: Vec<_> = queue.iter().copied().collect();
    assert_eq!(result, vec![1, 2, 3]);
}

#[test]
fn test_iterable_large_queue() {
    const MAX: u32 = 3_000;

    let queue: SegmentedQueue<u32> = (0..MAX).collect();
    let result: Vec<_> = queue.iter().copied().collect();

    assert_eq!(result, (0..MAX).collect::<Vec<_>>());
}

#[test]
fn test_iteration_is_non_destructive() {
    let mut queue = queue_with_payloads(7);
    for i in 0..50 {
        queue.unshift(i);
    }

    let first: Vec<_> = queue.iter().copied().collect();
    let second: Vec<_> = queue.iter().copied().collect();

    assert_eq!(first, second);
    assert_eq!(first, (0..50).rev().collect::<Vec<_>>());
    assert_eq!(queue.len(), 50);
    assert!(!queue.is_empty());
}

// =============================================================================
// every / find
// =============================================================================

#[test]
fn test_every_method() {
    let mut queue = SegmentedQueue::new();
    queue.push(1);
    queue.push(2);
    queue.push(3);

    assert!(queue.every(|x| *x > 0));
    assert!(!queue.every(|x| *x < 3));
}

#[test]
fn test_every_empty_queue() {
    let queue: SegmentedQueue<u32> = SegmentedQueue::new();
    assert!(queue.every(|_| false));
}

#[test]
fn test_find_method() {
    let mut queue = SegmentedQueue::new();
    queue.push(10);
    queue.push(20);
    queue.push(30);

    assert_eq!(queue.find(|x| *x == 20), Some(&20));
    assert_eq!(queue.find(|x| *x == 100), None);
}

#[test]
fn test_find_empty_queue() {
    let queue: SegmentedQueue<u32> = SegmentedQueue::new();
    assert_eq!(queue.find(|_| true), None);
}

#[test]
fn test_find_across_segments() {
    let queue: SegmentedQueue<u32> = {
        let mut queue = queue_with_payloads(3);
        queue.extend(0..30);
        queue
    };

    assert_eq!(queue.find(|x| *x > 25), Some(&26));
}

// =============================================================================
// Sort
// =============================================================================

#[test]
fn test_sort_small_queue() {
    let mut queue = SegmentedQueue::new();
    queue.push(3);
    queue.push(1);
    queue.push(2);

    queue.sort();

    assert_eq!(queue.shift(), Some(1));
    assert_eq!(queue.shift(), Some(2));
    assert_eq!(queue.shift(), Some(3));
}

#[test]
fn test_sort_large_queue() {
    const MAX: u32 = 3_000;

    let mut queue = SegmentedQueue::new();
    for i in (1..=MAX).rev() {
        queue.push(i);
    }

    queue.sort_by(|a, b| a.cmp(b));

    assert_eq!(queue.len(), MAX as usize);
    let result: Vec<_> = queue.iter().copied().collect();
    assert_eq!(result, (1..=MAX).collect::<Vec<_>>());
}

#[test]
fn test_sort_pseudo_random_multiset() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let values: Vec<u64> = (0..5_000).map(|_| rng.random_range(0..100)).collect();

    let mut queue = queue_with_payloads(63);
    queue.extend(values.iter().copied());
    queue.unshift(1000);

    queue.sort_by(|a, b| b.cmp(a));

    let mut expected = values;
    expected.push(1000);
    expected.sort_by(|a, b| b.cmp(a));

    assert_eq!(queue.len(), expected.len());
    assert_eq!(queue.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_sort_empty_queue() {
    let mut queue: SegmentedQueue<u32> = SegmentedQueue::new();
    queue.sort();
    assert!(queue.is_empty());
    assert_eq!(queue.shift(), None);
}

#[test]
fn test_sort_partial_ord_with_fallible_comparator() {
    let mut queue = SegmentedQueue::new();
    queue.push(2.5f64);
    queue.push(-1.0);
    queue.push(0.5);

    let result = queue.try_sort_by(|a, b| a.partial_cmp(b).ok_or("NaN"));
    assert!(result.is_ok());
    assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![-1.0, 0.5, 2.5]);

    queue.push(f64::NAN);
    let result = queue.try_sort_by(|a, b| a.partial_cmp(b).ok_or("NaN"));
    assert_eq!(result.err(), Some("NaN"));
    assert!(queue.is_empty());
}

#[test]
fn test_sort_panicking_comparator_leaves_queue_empty() {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let mut queue: SegmentedQueue<u32> = (0..10).collect();

    let result = catch_unwind(AssertUnwindSafe(|| {
        queue.sort_by(|_, _| -> Ordering { panic!("comparator failed") });
    }));

    assert!(result.is_err());
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    queue.push(5);
    assert_eq!(queue.shift(), Some(5));
}

// =============================================================================
// Ownership
// =============================================================================

#[test]
fn test_queue_moves_across_threads() {
    let queue: SegmentedQueue<String> = (0..5000).map(|i| i.to_string()).collect();

    let handle = std::thread::spawn(move || queue.into_iter().collect::<Vec<_>>());
    let values = handle.join().unwrap();

    assert_eq!(values.len(), 5000);
    assert_eq!(values[4999], "4999");
}

#[test]
fn test_drop_long_chain() {
    // Dropping a long chain must not recurse per segment
    let mut queue = queue_with_payloads(1);
    for i in 0..200_000u32 {
        queue.push(i);
    }
    assert_eq!(queue.segment_count(), 200_000);
    drop(queue);
}
