//! Lap timing for benchmark iterations.
//!
//! A [`LapTimer`] measures consecutive laps of wall-clock time. The harness
//! restarts it right before an iteration and closes the lap right after the
//! result has been read back, so verification is not part of the lap.

use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Let the scheduler move the measuring thread freely
    #[default]
    Off,
    /// Pin the measuring thread while timing strategies that run on it alone
    SingleThreaded,
}

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Measured iterations per strategy (default: 10)
    pub iterations: usize,
    /// Verified but untimed runs before measuring (default: 0)
    pub warmup_iterations: usize,
    /// CPU pinning strategy (default: Off)
    pub pin_strategy: PinStrategy,
    /// Keep running the other strategies after a failure (default: false)
    pub keep_going: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            warmup_iterations: 0,
            pin_strategy: PinStrategy::default(),
            keep_going: false,
        }
    }
}

// ============================================================================
// Lap timer
// ============================================================================

/// Stopwatch that records consecutive laps.
#[derive(Debug)]
pub struct LapTimer {
    start: Instant,
    laps: Vec<Duration>,
}

impl LapTimer {
    /// Start a timer with no laps recorded.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            laps: Vec::new(),
        }
    }

    /// Start the current lap from now.
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// Close the current lap, record it and start the next one.
    pub fn next_lap(&mut self) -> Duration {
        let now = Instant::now();
        let lap = now - self.start;
        self.laps.push(lap);
        self.start = now;
        lap
    }

    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    pub fn into_laps(self) -> Vec<Duration> {
        self.laps
    }
}

impl Default for LapTimer {
    fn default() -> Self {
        Self::new()
    }
}
