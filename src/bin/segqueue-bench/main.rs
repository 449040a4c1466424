//! In-process queue benchmark. Drives a `SegmentedQueue` as a ready queue
//! with a configurable push/unshift/shift mix.

mod config;
mod logging;
mod metrics;
mod worker;

use crate::config::Config;
use crate::worker::{Phase, SharedState};

use clap::Parser;
use metriken::{AtomicHistogram, histogram::Histogram};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "segqueue-bench")]
#[command(about = "In-process segmented queue benchmark")]
struct Args {
    /// Path to configuration file
    config: Option<PathBuf>,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_config {
        print!("{}", config::DEFAULT_CONFIG);
        return;
    }

    let Some(path) = args.config else {
        eprintln!("No config file specified. Pass a config path or use --print-config");
        std::process::exit(1);
    };

    let config = match Config::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    logging::init(&config.logging);

    if let Err(e) = run(config) {
        tracing::error!(error = %e, "benchmark failed");
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    print_config(&config);

    let warmup = config.general.warmup;
    let duration = config.general.duration;

    let shared = Arc::new(SharedState::new());

    // Signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    if config.queue.prefill > 0 {
        eprintln!("prefilling {} items...", config.queue.prefill);
    }
    shared.set_phase(Phase::Prefill);

    let config = Arc::new(config);
    let handle = {
        let config = Arc::clone(&config);
        let shared = Arc::clone(&shared);
        thread::Builder::new()
            .name("worker".to_string())
            .spawn(move || worker::run_worker(&config, &shared))?
    };

    // Main thread: reporting loop
    let report_interval = Duration::from_secs(1);
    let mut last_report = Instant::now();
    let mut last_completed = 0u64;
    let mut last_histogram: Option<Histogram> = None;
    let mut current_phase = Phase::Prefill;
    let mut warmup_start: Option<Instant> = None;

    loop {
        thread::sleep(Duration::from_millis(100));

        // Check signal
        if !running.load(Ordering::SeqCst) {
            tracing::info!("interrupted, stopping worker");
            shared.set_phase(Phase::Stop);
            break;
        }

        // Worker exited early
        if handle.is_finished() {
            shared.set_phase(Phase::Stop);
            break;
        }

        // Handle prefill -> warmup transition
        if current_phase == Phase::Prefill {
            if shared.is_prefill_complete() {
                shared.set_phase(Phase::Warmup);
                current_phase = Phase::Warmup;
                warmup_start = Some(Instant::now());
                eprintln!("warming up for {:?}...", warmup);
            }
            continue;
        }

        let elapsed = warmup_start.map(|s| s.elapsed()).unwrap_or_default();

        // Check if done
        if elapsed >= warmup + duration {
            shared.set_phase(Phase::Stop);
            break;
        }

        // Transition from warmup to running
        if current_phase == Phase::Warmup && elapsed >= warmup {
            shared.set_phase(Phase::Running);
            current_phase = Phase::Running;
            eprintln!("running for {:?}...", duration);
            print_header();
            last_report = Instant::now();
            last_completed = metrics::COMPLETED_COUNT.value();
            last_histogram = metrics::RESPONSE_LATENCY.load();
        }

        // Skip reporting during warmup
        if current_phase != Phase::Running {
            continue;
        }

        // Periodic reporting
        if last_report.elapsed() >= report_interval {
            let completed = metrics::COMPLETED_COUNT.value();
            let elapsed_secs = last_report.elapsed().as_secs_f64();

            let delta_completed = completed - last_completed;
            let rate = delta_completed as f64 / elapsed_secs;
            last_completed = completed;

            // Interval percentiles via wrapping_sub
            let current_histogram = metrics::RESPONSE_LATENCY.load();
            let (p50, p90, p99, p999, max) = match (&current_histogram, &last_histogram) {
                (Some(current), Some(previous)) => {
                    if let Ok(delta) = current.wrapping_sub(previous) {
                        latency_row(&delta)
                    } else {
                        (0.0, 0.0, 0.0, 0.0, 0.0)
                    }
                }
                (Some(current), None) => latency_row(current),
                _ => (0.0, 0.0, 0.0, 0.0, 0.0),
            };
            last_histogram = current_histogram;

            println!(
                "{:>12.0} {:>10} {:>9} {:>9.0} {:>9.0} {:>9.0} {:>9.0} {:>9.0}",
                rate,
                metrics::QUEUE_LENGTH.value(),
                metrics::QUEUE_SEGMENTS.value(),
                p50,
                p90,
                p99,
                p999,
                max,
            );

            last_report = Instant::now();
        }
    }

    match handle.join() {
        Ok(result) => result?,
        Err(_) => return Err("worker thread panicked".into()),
    }

    print_summary(&config);

    Ok(())
}

fn print_config(config: &Config) {
    eprintln!("segqueue-bench configuration:");
    eprintln!("  seg_capacity: {}", config.queue.segment_capacity);
    eprintln!("  prefill:      {}", config.queue.prefill);
    eprintln!("  duration:     {:?}", config.general.duration);
    eprintln!("  warmup:       {:?}", config.general.warmup);
    eprintln!(
        "  mix:          push={} unshift={} shift={}",
        config.workload.push, config.workload.unshift, config.workload.shift,
    );
    eprintln!("  batch:        {}", config.workload.batch);
    eprintln!();
}

fn print_header() {
    println!(
        "{:>12} {:>10} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "ops/sec", "len", "segments", "p50(ns)", "p90(ns)", "p99(ns)", "p999(ns)", "max(ns)",
    );
    println!("{}", "-".repeat(84));
}

fn print_summary(config: &Config) {
    let pushes = metrics::PUSH_COUNT.value();
    let unshifts = metrics::UNSHIFT_COUNT.value();
    let shifts = metrics::SHIFT_COUNT.value();
    let shift_empty = metrics::SHIFT_EMPTY.value();
    let completed = metrics::COMPLETED_COUNT.value();

    let elapsed = config.general.duration.as_secs_f64();
    let avg_rate = if elapsed > 0.0 {
        completed as f64 / elapsed
    } else {
        0.0
    };

    eprintln!();
    eprintln!("=== Final Summary ===");
    eprintln!("  total ops:    {completed}");
    eprintln!("  avg ops/sec:  {avg_rate:.0}");
    eprintln!("  pushes:       {pushes}");
    eprintln!("  unshifts:     {unshifts}");
    eprintln!("  shifts:       {shifts} (empty: {shift_empty})");
    eprintln!("  final len:    {}", metrics::QUEUE_LENGTH.value());
    eprintln!(
        "  segments:     {} allocated, {} freed",
        segqueue::metrics::SEGMENT_ALLOC.value(),
        segqueue::metrics::SEGMENT_FREE.value(),
    );
    eprintln!();

    // Per-operation latency breakdown
    print_latency_summary("PUSH", &metrics::PUSH_LATENCY);
    if unshifts > 0 {
        print_latency_summary("UNSHIFT", &metrics::UNSHIFT_LATENCY);
    }
    print_latency_summary("SHIFT", &metrics::SHIFT_LATENCY);
    print_latency_summary("ALL", &metrics::RESPONSE_LATENCY);
}

fn print_latency_summary(label: &str, hist: &AtomicHistogram) {
    let (p50, p90, p99, p999, max) = match hist.load() {
        Some(snapshot) => latency_row(&snapshot),
        None => (0.0, 0.0, 0.0, 0.0, 0.0),
    };

    eprintln!(
        "  {label:<7} latency (ns): p50={p50:.0}  p90={p90:.0}  p99={p99:.0}  p999={p999:.0}  max={max:.0}",
    );
}

// --- Histogram helpers ---

fn latency_row(hist: &Histogram) -> (f64, f64, f64, f64, f64) {
    (
        percentile_from_histogram(hist, 50.0),
        percentile_from_histogram(hist, 90.0),
        percentile_from_histogram(hist, 99.0),
        percentile_from_histogram(hist, 99.9),
        percentile_from_histogram(hist, 100.0),
    )
}

fn percentile_from_histogram(hist: &Histogram, p: f64) -> f64 {
    if let Ok(Some(results)) = hist.percentiles(&[p])
        && let Some((_pct, bucket)) = results.first()
    {
        return bucket.end() as f64;
    }
    0.0
}
