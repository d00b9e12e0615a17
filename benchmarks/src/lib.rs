//! Benchmark utilities for crossframe.
//!
//! - Seeded synthetic datasets with informative and noise columns
//! - Timing helpers used by the `benchmarks` binary

pub mod data;
pub mod utils;

pub use data::{SyntheticData, SyntheticSpec};
pub use utils::{benchmark_with_warmup, time_fn, BenchmarkStats};
