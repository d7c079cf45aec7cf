//! Error types shared by the generator, the device and the benchmark harness.
//!
//! | Error              | Effect                                          |
//! |--------------------|-------------------------------------------------|
//! | Mismatch           | Aborts the strategy that produced it            |
//! | BackendUnavailable | Fatal for the whole run                         |
//! | InvalidConfig      | Rejected before anything is dispatched          |
//! | UnsafeBound        | Rejected before any input is generated          |
//! | UnknownStrategy    | CLI lookup failure                              |
//! | Io                 | CSV export failure                              |
//!
//! Nothing is retried: a wrong sum is a bug in a strategy and a missing
//! thread pool will not appear on a second attempt.

use thiserror::Error;

/// Central error type for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// A strategy produced a sum different from the reference sum.
    #[error(
        "{strategy} result should be consistent! expected {expected}, got {actual} \
         (iteration {iteration} of {iterations})"
    )]
    Mismatch {
        strategy: String,
        expected: u32,
        actual: u32,
        iteration: usize,
        iterations: usize,
    },

    /// The compute backend could not be created.
    #[error("compute backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Strategy parameters failed validation.
    #[error("invalid {strategy} configuration: {reason}")]
    InvalidConfig {
        strategy: &'static str,
        reason: String,
    },

    /// The requested element bound lets the sum of `size` elements overflow `u32`.
    #[error("upper bound {upper_bound} is unsafe for {size} elements (max {max})")]
    UnsafeBound {
        upper_bound: u32,
        size: usize,
        max: u32,
    },

    /// No strategy with that name exists.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ReduceError>;
