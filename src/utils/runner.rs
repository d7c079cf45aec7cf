//! Benchmark harness: repeated, verified runs of each strategy, and CSV export.
//!
//! Every strategy goes through its own state machine:
//!
//! ```text
//! Idle -> Running(1 of K) -> ... -> Running(K of K) -> Verified
//!                 \___________________________\______> Failed
//! ```
//!
//! A failure ends that strategy's run. Whether the remaining strategies still
//! run is decided by [`TimingConfig::keep_going`].

use std::fmt;
use std::io::Write;
use std::time::Duration;

use tracing::{debug, error, info};

use super::bench::BenchmarkResult;
use super::cpu_affinity::CpuPinGuard;
use super::timer::{LapTimer, PinStrategy, TimingConfig};
use crate::device::{ComputeBackend, GlobalAccumulator};
use crate::error::{ReduceError, Result};
use crate::input::InputArray;
use crate::reduce::sum::Strategy;

/// Where a strategy is in its benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running { iteration: usize, of: usize },
    Verified,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running { iteration, of } => write!(f, "running {iteration}/{of}"),
            RunState::Verified => write!(f, "verified"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

fn check(
    strategy: &Strategy,
    expected: u32,
    actual: u32,
    iteration: usize,
    of: usize,
) -> Result<()> {
    if actual == expected {
        return Ok(());
    }
    Err(ReduceError::Mismatch {
        strategy: strategy.to_string(),
        expected,
        actual,
        iteration,
        iterations: of,
    })
}

/// Warmup runs, then `config.iterations` timed laps, each checked against
/// `expected`.
fn measure(
    strategy: &Strategy,
    input: &InputArray,
    backend: &dyn ComputeBackend,
    config: &TimingConfig,
    expected: u32,
) -> Result<Vec<Duration>> {
    let iterations = config.iterations;
    let acc = GlobalAccumulator::new();

    for _ in 0..config.warmup_iterations {
        acc.reset();
        let actual = strategy.execute(input.values(), backend, &acc);
        check(strategy, expected, actual, 0, iterations)?;
    }

    let mut timer = LapTimer::new();
    for iteration in 1..=iterations {
        let state = RunState::Running {
            iteration,
            of: iterations,
        };
        timer.restart();
        acc.reset();
        let actual = strategy.execute(input.values(), backend, &acc);
        let lap = timer.next_lap();
        debug!(strategy = %strategy, %state, sum = actual, lap_secs = lap.as_secs_f64());
        check(strategy, expected, actual, iteration, iterations)?;
    }
    Ok(timer.into_laps())
}

/// Benchmark one strategy.
///
/// Warmup runs are verified but not timed and are reported as iteration 0.
/// Each measured lap covers accumulator reset, execution and read-back.
pub fn run_strategy(
    strategy: &Strategy,
    input: &InputArray,
    backend: &dyn ComputeBackend,
    config: &TimingConfig,
) -> Result<BenchmarkResult> {
    let expected = input.reference_sum();
    debug!(strategy = %strategy, state = %RunState::Idle);

    let pin = (config.pin_strategy == PinStrategy::SingleThreaded
        && strategy.is_single_threaded())
    .then(CpuPinGuard::new);
    if let Some(guard) = &pin {
        debug!(strategy = %strategy, core = ?guard.core_id(), "measuring thread pinned");
    }

    match measure(strategy, input, backend, config, expected) {
        Ok(laps) => {
            debug!(strategy = %strategy, state = %RunState::Verified);
            Ok(BenchmarkResult::new(
                strategy.to_string(),
                strategy.descriptor(),
                input.len(),
                laps,
                expected,
            ))
        }
        Err(e) => {
            error!(
                strategy = %strategy,
                state = %RunState::Failed,
                error = %e,
                "correctness violation"
            );
            Err(e)
        }
    }
}

/// Outcome of a whole benchmark run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<BenchmarkResult>,
    pub failures: Vec<ReduceError>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Benchmark `strategies` in order, handing each verified result to `report`
/// as soon as it is available.
pub fn run_all(
    strategies: &[Strategy],
    input: &InputArray,
    backend: &dyn ComputeBackend,
    config: &TimingConfig,
    report: &mut dyn FnMut(&BenchmarkResult),
) -> RunSummary {
    info!(
        strategies = strategies.len(),
        size = input.len(),
        iterations = config.iterations,
        device = backend.name(),
        "benchmark run"
    );

    let mut summary = RunSummary::default();
    for strategy in strategies {
        match run_strategy(strategy, input, backend, config) {
            Ok(result) => {
                report(&result);
                summary.results.push(result);
            }
            Err(e) => {
                summary.failures.push(e);
                if !config.keep_going {
                    break;
                }
            }
        }
    }
    summary
}

/// Write one row per lap.
pub fn write_csv<W: Write>(mut out: W, results: &[BenchmarkResult]) -> std::io::Result<()> {
    writeln!(
        out,
        "strategy,work_group_size,values_per_work_item,local_buffer_size,size,iteration,seconds"
    )?;

    for result in results {
        let d = &result.descriptor;
        for (i, lap) in result.laps.iter().enumerate() {
            writeln!(
                out,
                "{},{},{},{},{},{},{:.9}",
                d.name,
                d.work_group_size,
                d.values_per_work_item,
                d.local_buffer_size,
                result.size,
                i + 1,
                lap.as_secs_f64()
            )?;
        }
    }

    Ok(())
}

/// Export laps to a CSV file at `path`.
pub fn export_csv(path: &str, results: &[BenchmarkResult]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    write_csv(&mut out, results)?;
    out.flush()?;
    Ok(())
}
