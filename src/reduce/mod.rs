//! Reductions over `u32` arrays.

pub mod sum;
