//! Lap statistics and per-strategy benchmark results.

use std::time::Duration;

use crate::reduce::sum::StrategyDescriptor;

/// Arithmetic mean of a list of durations, zero when empty.
pub fn mean(times: &[Duration]) -> Duration {
    if times.is_empty() {
        return Duration::ZERO;
    }
    let total: Duration = times.iter().sum();
    total / times.len() as u32
}

/// Calculate standard deviation from a list of durations
pub fn calculate_std_dev(times: &[Duration], mean: Duration) -> Duration {
    if times.len() < 2 {
        return Duration::ZERO;
    }

    let mean_ns = mean.as_nanos() as f64;
    let variance: f64 = times
        .iter()
        .map(|t| {
            let diff = t.as_nanos() as f64 - mean_ns;
            diff * diff
        })
        .sum::<f64>()
        / (times.len() - 1) as f64;

    Duration::from_nanos(variance.sqrt() as u64)
}

/// Calculate median from a slice of durations.
pub fn calculate_median(times: &[Duration]) -> Duration {
    if times.is_empty() {
        return Duration::ZERO;
    }
    let mut sorted = times.to_vec();
    sorted.sort();
    sorted[sorted.len() / 2]
}

/// Summary of a strategy's laps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LapStats {
    pub mean: Duration,
    pub std_dev: Duration,
    pub min: Duration,
    pub median: Duration,
    pub max: Duration,
}

/// Compute timing statistics from a list of durations
pub fn compute_stats(times: &[Duration]) -> LapStats {
    let mean = mean(times);
    LapStats {
        mean,
        std_dev: calculate_std_dev(times, mean),
        min: times.iter().min().copied().unwrap_or(Duration::ZERO),
        median: calculate_median(times),
        max: times.iter().max().copied().unwrap_or(Duration::ZERO),
    }
}

/// Laps of one verified strategy and what they imply.
#[derive(Clone, Debug)]
pub struct BenchmarkResult {
    pub label: String,
    pub descriptor: StrategyDescriptor,
    /// Elements summed per iteration.
    pub size: usize,
    pub laps: Vec<Duration>,
    pub stats: LapStats,
    /// The verified sum.
    pub sum: u32,
}

impl BenchmarkResult {
    pub fn new(
        label: String,
        descriptor: StrategyDescriptor,
        size: usize,
        laps: Vec<Duration>,
        sum: u32,
    ) -> Self {
        let stats = compute_stats(&laps);
        Self {
            label,
            descriptor,
            size,
            laps,
            stats,
            sum,
        }
    }

    pub fn mean_secs(&self) -> f64 {
        self.stats.mean.as_secs_f64()
    }

    pub fn std_dev_secs(&self) -> f64 {
        self.stats.std_dev.as_secs_f64()
    }

    /// Millions of elements summed per second of mean lap.
    pub fn throughput_millions(&self) -> f64 {
        let secs = self.mean_secs();
        if secs > 0.0 {
            (self.size as f64 / 1000.0 / 1000.0) / secs
        } else {
            0.0
        }
    }
}
