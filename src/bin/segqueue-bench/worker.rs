//! Worker thread driving the queue workload.

use crate::config::Config;
use crate::metrics;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use segqueue::SegmentedQueue;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Instant;

/// Test phase, controlled by main thread and read by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Push `queue.prefill` items once.
    Prefill = 0,
    /// Run the workload without recording metrics.
    Warmup = 1,
    /// Run the workload and record metrics.
    Running = 2,
    /// The worker should exit.
    Stop = 3,
}

impl Phase {
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Phase::Prefill,
            1 => Phase::Warmup,
            2 => Phase::Running,
            _ => Phase::Stop,
        }
    }
}

/// Shared state between main thread and the worker.
pub struct SharedState {
    phase: AtomicU8,
    prefill_complete: AtomicBool,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Prefill as u8),
            prefill_complete: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    pub fn mark_prefill_complete(&self) {
        self.prefill_complete.store(true, Ordering::Release);
    }

    pub fn is_prefill_complete(&self) -> bool {
        self.prefill_complete.load(Ordering::Acquire)
    }
}

/// Queue operation chosen for one step of the workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Push,
    Unshift,
    Shift,
}

/// Maps a roll in `0..100` onto the configured operation mix.
#[derive(Debug, Clone, Copy)]
pub struct OpMix {
    push_threshold: u8,
    unshift_threshold: u8,
}

impl OpMix {
    pub fn new(push: u8, unshift: u8) -> Self {
        Self {
            push_threshold: push,
            unshift_threshold: push + unshift,
        }
    }

    #[inline]
    pub fn pick(&self, roll: u8) -> Op {
        if roll < self.push_threshold {
            Op::Push
        } else if roll < self.unshift_threshold {
            Op::Unshift
        } else {
            Op::Shift
        }
    }
}

/// Run the workload until the main thread sets [`Phase::Stop`].
///
/// The queue lives entirely on this thread.
pub fn run_worker(config: &Config, shared: &SharedState) -> Result<(), segqueue::QueueError> {
    let mut queue: SegmentedQueue<u64> = config.queue.build()?;
    let mix = OpMix::new(config.workload.push, config.workload.unshift);
    let batch = config.workload.batch;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.workload.seed);
    let mut next_id = 0u64;

    // Prefill phase
    for _ in 0..config.queue.prefill {
        queue.push(next_id);
        next_id += 1;
    }
    tracing::debug!(
        len = queue.len(),
        segments = queue.segment_count(),
        "prefill complete"
    );
    publish_shape(&queue);
    shared.mark_prefill_complete();

    // Main loop
    loop {
        let phase = shared.phase();
        match phase {
            Phase::Prefill => {
                // Wait for the main thread to start warmup
                std::hint::spin_loop();
                continue;
            }
            Phase::Stop => break,
            Phase::Warmup | Phase::Running => {}
        }

        let recording = phase == Phase::Running;

        for _ in 0..batch {
            let roll: u8 = rng.random_range(0..100);

            match mix.pick(roll) {
                Op::Push => {
                    let start = Instant::now();
                    queue.push(next_id);
                    let elapsed_ns = start.elapsed().as_nanos() as u64;
                    next_id += 1;

                    if recording {
                        metrics::PUSH_COUNT.increment();
                        metrics::COMPLETED_COUNT.increment();
                        let _ = metrics::RESPONSE_LATENCY.increment(elapsed_ns);
                        let _ = metrics::PUSH_LATENCY.increment(elapsed_ns);
                    }
                }
                Op::Unshift => {
                    let start = Instant::now();
                    queue.unshift(next_id);
                    let elapsed_ns = start.elapsed().as_nanos() as u64;
                    next_id += 1;

                    if recording {
                        metrics::UNSHIFT_COUNT.increment();
                        metrics::COMPLETED_COUNT.increment();
                        let _ = metrics::RESPONSE_LATENCY.increment(elapsed_ns);
                        let _ = metrics::UNSHIFT_LATENCY.increment(elapsed_ns);
                    }
                }
                Op::Shift => {
                    let start = Instant::now();
                    let value = queue.shift();
                    let elapsed_ns = start.elapsed().as_nanos() as u64;

                    if recording {
                        metrics::SHIFT_COUNT.increment();
                        metrics::COMPLETED_COUNT.increment();
                        if value.is_none() {
                            metrics::SHIFT_EMPTY.increment();
                        }
                        let _ = metrics::RESPONSE_LATENCY.increment(elapsed_ns);
                        let _ = metrics::SHIFT_LATENCY.increment(elapsed_ns);
                    }
                }
            }
        }

        publish_shape(&queue);
    }

    tracing::debug!(
        len = queue.len(),
        segments = queue.segment_count(),
        "worker stopped"
    );

    Ok(())
}

fn publish_shape(queue: &SegmentedQueue<u64>) {
    metrics::QUEUE_LENGTH.set(queue.len() as i64);
    metrics::QUEUE_SEGMENTS.set(queue.segment_count() as i64);
}
