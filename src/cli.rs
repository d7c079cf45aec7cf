//! Command-line interface of `sum-bench`.

use clap::{ArgAction, Parser};

use crate::input::max_safe_bound;
use crate::reduce::sum::KernelParams;
use crate::utils::{PinStrategy, TimingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "sum-bench",
    version,
    about = "Benchmark parallel strategies for summing a u32 array",
    after_help = "Speedup in the summary table is relative to the first strategy run."
)]
pub struct Cli {
    /// Strategies to run, in order (default: all)
    #[arg(value_name = "STRATEGY")]
    pub strategies: Vec<String>,

    /// Number of elements to sum
    #[arg(short = 'n', long, default_value_t = 100_000_000)]
    pub size: usize,

    /// Measured iterations per strategy
    #[arg(long, default_value_t = 10)]
    pub iters: usize,

    /// Verified but untimed runs before measuring
    #[arg(long, default_value_t = 0)]
    pub warmup: usize,

    /// Seed of the input generator
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Largest element value (default: u32::MAX / size)
    #[arg(long)]
    pub upper_bound: Option<u32>,

    /// Work items per work group
    #[arg(long, default_value_t = 128)]
    pub work_group_size: usize,

    /// Elements folded per work item by the loop kernels
    #[arg(long = "values-per-item", default_value_t = 128)]
    pub values_per_item: usize,

    /// Elements folded per work item by the local-memory kernels (0 = one)
    #[arg(long = "local-values-per-item", default_value_t = 0)]
    pub local_values_per_item: usize,

    /// Local-memory slots per group (default: work-group size)
    #[arg(long)]
    pub local_buffer_size: Option<usize>,

    /// Worker threads of the device pool (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Pin the measuring thread while timing the sequential baseline
    #[arg(long)]
    pub pin: bool,

    /// Run the remaining strategies after a correctness failure
    #[arg(long)]
    pub keep_going: bool,

    /// Export every lap to a CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<String>,

    /// List available strategies and exit
    #[arg(short, long)]
    pub list: bool,

    /// Run the quick correctness sweep and exit
    #[arg(long)]
    pub verify: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn kernel_params(&self) -> KernelParams {
        KernelParams {
            work_group_size: self.work_group_size,
            values_per_work_item: self.values_per_item,
            local_values_per_work_item: self.local_values_per_item,
            local_buffer_size: self.local_buffer_size.unwrap_or(self.work_group_size),
        }
    }

    pub fn timing_config(&self) -> TimingConfig {
        TimingConfig {
            iterations: self.iters,
            warmup_iterations: self.warmup,
            pin_strategy: if self.pin {
                PinStrategy::SingleThreaded
            } else {
                PinStrategy::Off
            },
            keep_going: self.keep_going,
        }
    }

    pub fn upper_bound(&self) -> u32 {
        self.upper_bound.unwrap_or_else(|| max_safe_bound(self.size))
    }

    /// Default `tracing` filter for the verbosity flag.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
