//! Benchmark CLI for the sum strategies.
//!
//! Usage:
//!   sum-bench                         # Run every strategy on 100M elements
//!   sum-bench --list                  # List available strategies
//!   sum-bench cpu local-memory-tree   # Run a subset, in that order
//!   sum-bench --verify                # Quick correctness sweep
//!   sum-bench --help                  # Show help

use std::process::ExitCode;

use clap::Parser;
use parallel_sum::cli::Cli;
use parallel_sum::device::CpuDevice;
use parallel_sum::error::Result;
use parallel_sum::input::InputArray;
use parallel_sum::reduce::sum::test::verify_all;
use parallel_sum::reduce::sum::KernelParams;
use parallel_sum::registry::{build_registry, build_selection};
use parallel_sum::tui;
use parallel_sum::utils::{export_csv, run_all};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.list {
        tui::print_available_strategies(&build_registry(&KernelParams::default())?);
        return Ok(ExitCode::SUCCESS);
    }

    let device = CpuDevice::new(cli.threads)?;

    if cli.verify {
        verify_all(&device)?;
        info!("all strategies verified");
        return Ok(ExitCode::SUCCESS);
    }

    let selection = build_selection(&cli.kernel_params(), &cli.strategies)?;
    let input = InputArray::generate(cli.seed, cli.size, cli.upper_bound())?;
    info!(
        size = input.len(),
        seed = cli.seed,
        upper_bound = input.upper_bound(),
        reference_sum = input.reference_sum(),
        "input generated"
    );

    tui::print_header(&input, &device);

    let timing = cli.timing_config();
    let summary = run_all(
        selection.all(),
        &input,
        &device,
        &timing,
        &mut tui::print_strategy_result,
    );

    tui::print_results_table(&summary.results, timing.iterations);

    if let Some(path) = cli.csv.as_deref() {
        export_csv(path, &summary.results)?;
        info!(path, rows = summary.results.len() * timing.iterations, "laps exported");
    }

    for failure in &summary.failures {
        error!("{failure}");
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
