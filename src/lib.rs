//! segqueue: a FIFO queue built from a chain of fixed-size ring buffers.
//!
//! This crate provides a queue for sustained high-frequency enqueue/dequeue
//! cycles, such as a scheduler's ready queue:
//!
//! - **Segment**: fixed-capacity circular buffer with masked cursors
//! - **SegmentedQueue**: chain of segments that grows and shrinks one segment
//!   at a time, with an O(1) running length
//! - **Iterators**: borrowing, owning and draining traversal
//! - **LinkedList**: plain doubly-linked list with the same FIFO contract
//!
//! # Architecture
//!
//! ```text
//!   shift / unshift                                         push
//!         |                                                   |
//!         v                                                   v
//!   +-----------+   next   +-----------+   next   +-----------+
//!   |   tail    | -------> |  segment  | -------> |   head    |
//!   | (oldest)  |          |           |          | (newest)  |
//!   +-----------+          +-----------+          +-----------+
//! ```
//!
//! # Example
//!
//! ```
//! use segqueue::SegmentedQueue;
//!
//! let mut queue = SegmentedQueue::new();
//! for i in 0..3000 {
//!     queue.push(i);
//! }
//! assert_eq!(queue.segment_count(), 2);
//!
//! for i in 0..3000 {
//!     assert_eq!(queue.shift(), Some(i));
//! }
//! assert!(queue.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod iter;
mod list;
mod queue;
mod segment;

pub mod metrics;

pub use error::{QueueError, QueueResult};
pub use iter::{Drain, IntoIter, Iter};
pub use list::LinkedList;
pub use queue::{QueueBuilder, SegmentedQueue};
pub use segment::{DEFAULT_SEGMENT_CAPACITY, Segment};
