//! Fill values for missing numeric entries.

use serde::{Deserialize, Serialize};

/// Strategy for imputing missing numeric values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Mean of the present values.
    #[default]
    Mean,
    /// Median of the present values.
    Median,
    /// A fixed value.
    Constant(f64),
}

impl ImputeStrategy {
    /// Compute the fill value from the present values.
    ///
    /// An all-missing input yields `0.0` for the data-driven strategies.
    pub fn fill_value(&self, present: &[f64]) -> f64 {
        if let ImputeStrategy::Constant(v) = self {
            return *v;
        }
        if present.is_empty() {
            return 0.0;
        }
        match self {
            ImputeStrategy::Mean => present.iter().sum::<f64>() / present.len() as f64,
            ImputeStrategy::Median => {
                let mut sorted = present.to_vec();
                sorted.sort_by(f64::total_cmp);
                let n = sorted.len();
                if n % 2 == 0 {
                    (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
                } else {
                    sorted[n / 2]
                }
            }
            ImputeStrategy::Constant(v) => *v,
        }
    }
}
