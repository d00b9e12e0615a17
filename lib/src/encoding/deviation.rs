//! Within-level outcome spread.

use super::levels::{level_key, LevelTable};
use super::{ColumnEncoder, FitInput, FittedColumnEncoder};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Y-aware encoder mapping each level to the outcome standard deviation within
/// it, shrunk toward the fit-set standard deviation:
/// `sqrt((n_l * var_l + m * var) / (n_l + m))`.
///
/// Regression outcomes only.
#[derive(Clone, Debug)]
pub struct LevelDeviation {
    smoothing: f64,
    max_levels: usize,
}

impl LevelDeviation {
    pub fn new(smoothing: f64, max_levels: usize) -> Self {
        Self {
            smoothing,
            max_levels,
        }
    }
}

/// Fitted [`LevelDeviation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedLevelDeviation {
    names: Vec<String>,
    deviations: BTreeMap<String, f64>,
    global_deviation: f64,
}

impl FittedLevelDeviation {
    pub fn global_deviation(&self) -> f64 {
        self.global_deviation
    }
}

impl ColumnEncoder for LevelDeviation {
    type Fitted = FittedLevelDeviation;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        if input.outcome.kind().is_classification() {
            return Err(EncodeError::UnsupportedOutcome {
                encoder: "deviation",
                outcome: input.outcome.kind().as_str(),
            });
        }
        let table = LevelTable::collect(input, self.max_levels)?;
        let global_var = table.total.variance();
        let m = self.smoothing;

        let deviations = table
            .levels
            .into_iter()
            .map(|(level, stats)| {
                let n = stats.count as f64;
                let pooled = if n + m > 0.0 {
                    (n * stats.variance() + m * global_var) / (n + m)
                } else {
                    global_var
                };
                (level, pooled.max(0.0).sqrt())
            })
            .collect();

        Ok(FittedLevelDeviation {
            names: vec![format!("{}_deviation", input.column)],
            deviations,
            global_deviation: global_var.sqrt(),
        })
    }
}

impl FittedColumnEncoder for FittedLevelDeviation {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        vec![rows
            .iter()
            .map(|&r| {
                self.deviations
                    .get(level_key(data, r).as_ref())
                    .copied()
                    .unwrap_or(self.global_deviation)
            })
            .collect()]
    }
}
