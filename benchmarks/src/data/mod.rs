//! Benchmark datasets.

mod synthetic;

pub use synthetic::{SyntheticData, SyntheticSpec};
