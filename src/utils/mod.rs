//! Utility modules for benchmarking and execution.

pub mod bench;
pub mod cpu_affinity;
pub mod runner;
pub mod timer;
pub mod tui;

// Re-export commonly used items
pub use bench::{calculate_std_dev, compute_stats, BenchmarkResult, LapStats};
pub use cpu_affinity::CpuPinGuard;
pub use runner::{export_csv, run_all, run_strategy, RunState, RunSummary};
pub use timer::{LapTimer, PinStrategy, TimingConfig};
