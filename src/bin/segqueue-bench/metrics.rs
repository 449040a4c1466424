//! Queue benchmark metrics.

use metriken::{AtomicHistogram, Counter, Gauge, metric};

// Operation counters
#[metric(name = "push_count", description = "Total push operations")]
pub static PUSH_COUNT: Counter = Counter::new();

#[metric(name = "unshift_count", description = "Total unshift operations")]
pub static UNSHIFT_COUNT: Counter = Counter::new();

#[metric(name = "shift_count", description = "Total shift operations")]
pub static SHIFT_COUNT: Counter = Counter::new();

#[metric(
    name = "shift_empty",
    description = "Shift operations that found the queue empty"
)]
pub static SHIFT_EMPTY: Counter = Counter::new();

#[metric(name = "completed_count", description = "Total completed operations")]
pub static COMPLETED_COUNT: Counter = Counter::new();

// Queue shape, published by the worker after each batch
#[metric(name = "queue_length", description = "Items currently queued")]
pub static QUEUE_LENGTH: Gauge = Gauge::new();

#[metric(name = "queue_segments", description = "Segments in the queue chain")]
pub static QUEUE_SEGMENTS: Gauge = Gauge::new();

// Latency histograms
#[metric(
    name = "response_latency",
    description = "Operation latency histogram (nanoseconds)"
)]
pub static RESPONSE_LATENCY: AtomicHistogram = AtomicHistogram::new(7, 64);

#[metric(
    name = "push_latency",
    description = "Push latency histogram (nanoseconds)"
)]
pub static PUSH_LATENCY: AtomicHistogram = AtomicHistogram::new(7, 64);

#[metric(
    name = "unshift_latency",
    description = "Unshift latency histogram (nanoseconds)"
)]
pub static UNSHIFT_LATENCY: AtomicHistogram = AtomicHistogram::new(7, 64);

#[metric(
    name = "shift_latency",
    description = "Shift latency histogram (nanoseconds)"
)]
pub static SHIFT_LATENCY: AtomicHistogram = AtomicHistogram::new(7, 64);
