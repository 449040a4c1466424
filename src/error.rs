//! Error types for queue construction.

/// Errors that can occur while building a queue or a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Segment capacity must be a power of two and at least 2.
    ///
    /// One slot of every segment is reserved to tell a full segment from an
    /// empty one, so a capacity of 1 could never hold a payload.
    #[error("invalid segment capacity {capacity} (must be a power of two >= 2)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

/// Result type for queue construction.
pub type QueueResult<T> = Result<T, QueueError>;

/// Check that `capacity` can be masked with `capacity - 1`.
pub(crate) fn validate_capacity(capacity: usize) -> QueueResult<usize> {
    if capacity < 2 || !capacity.is_power_of_two() {
        return Err(QueueError::InvalidCapacity { capacity });
    }
    Ok(capacity)
}
