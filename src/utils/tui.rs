//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::device::ComputeBackend;
use crate::input::InputArray;
use crate::registry::StrategyRegistry;
use crate::utils::bench::BenchmarkResult;
use crate::utils::cpu_affinity::online_cores;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// `"<label>: <mean>+-<std> s"`
pub fn format_timing_line(result: &BenchmarkResult) -> String {
    format!(
        "{}: {:.6}+-{:.6} s",
        result.label,
        result.mean_secs(),
        result.std_dev_secs()
    )
}

/// `"<label>: <throughput> millions/s"`
pub fn format_throughput_line(result: &BenchmarkResult) -> String {
    format!(
        "{}: {:.2} millions/s",
        result.label,
        result.throughput_millions()
    )
}

/// Print the two report lines of one verified strategy.
pub fn print_strategy_result(result: &BenchmarkResult) {
    println!("{}", format_timing_line(result));
    println!("{}", format_throughput_line(result));
}

/// `"<seed> (values in 0..=<bound>)"`, or the bound alone for explicit values.
fn format_input_origin(input: &InputArray) -> String {
    match input.seed() {
        Some(seed) => format!("{} (values in 0..={})", seed, input.upper_bound()),
        None => format!("explicit values (max {})", input.upper_bound()),
    }
}

/// `"<name>, <threads> threads"`, with the online core count when known.
fn format_device(backend: &dyn ComputeBackend, cores: Option<usize>) -> String {
    match cores {
        Some(cores) => format!(
            "{}, {} threads on {} cores",
            backend.name(),
            backend.threads(),
            cores
        ),
        None => format!("{}, {} threads", backend.name(), backend.threads()),
    }
}

/// Print the application header
pub fn print_header(input: &InputArray, backend: &dyn ComputeBackend) {
    let term_width = get_term_width().min(80);
    let title = " Parallel Sum Benchmarks ";
    let padding = term_width.saturating_sub(title.len()) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!("  Elements:    {}", input.len());
    println!("  Seed:        {}", format_input_origin(input));
    println!("  Device:      {}", format_device(backend, online_cores()));
    println!();
}

fn format_secs(secs: f64) -> String {
    if secs >= 1.0 {
        format!("{:.3} s", secs)
    } else if secs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else {
        format!("{:.3} us", secs * 1e6)
    }
}

/// Print the summary table. Speedup is relative to the first row.
pub fn print_results_table(results: &[BenchmarkResult], iterations: usize) {
    if results.is_empty() {
        return;
    }

    let term_width = get_term_width();
    let fixed_width = 72;
    let label_col_width = term_width.saturating_sub(fixed_width).max(24);
    let table_width = label_col_width + 64 + 6;

    let baseline = results.first().map(|r| r.mean_secs()).unwrap_or(0.0);

    println!();
    println!("  Summary ({} iterations)", iterations);
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<l_width$} {:>12} {:>12} {:>12} {:>12} {:>9}",
        "Strategy",
        "Mean",
        "Std",
        "Min",
        "M elem/s",
        "Speedup",
        l_width = label_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in results {
        let mean = result.mean_secs();
        let speedup = if mean > 0.0 { baseline / mean } else { 0.0 };

        println!(
            "  {:<l_width$} {:>12} {:>12} {:>12} {:>12.2} {:>8.2}x",
            truncate(&result.label, label_col_width),
            format_secs(mean),
            format_secs(result.std_dev_secs()),
            format_secs(result.stats.min.as_secs_f64()),
            result.throughput_millions(),
            speedup,
            l_width = label_col_width
        );
    }
    println!();
}

/// Print the list of available strategies, host baselines first
pub fn print_available_strategies(registry: &StrategyRegistry) {
    println!("Available strategies:");
    for category in ["cpu", "gpu"] {
        println!();
        for strategy in registry.by_category(category) {
            println!(
                "  {:<20} [{}] - {}",
                strategy.name(),
                strategy.category(),
                strategy.description()
            );
        }
    }
}
