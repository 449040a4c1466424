//! Segment lifecycle metrics.
//!
//! These are process-wide and shared by every queue in the process.

use metriken::{Counter, Gauge, metric};

/// Total segments allocated.
#[metric(
    name = "segqueue_segment_alloc",
    description = "Total ring buffer segments allocated"
)]
pub static SEGMENT_ALLOC: Counter = Counter::new();

/// Total segments released.
#[metric(
    name = "segqueue_segment_free",
    description = "Total ring buffer segments released"
)]
pub static SEGMENT_FREE: Counter = Counter::new();

/// Segments currently alive.
#[metric(
    name = "segqueue_segment_current",
    description = "Ring buffer segments currently allocated"
)]
pub static SEGMENT_CURRENT: Gauge = Gauge::new();
