//! Level frequency coding.

use super::levels::{level_key, LevelTable};
use super::{ColumnEncoder, FitInput, FittedColumnEncoder};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps each level to its share of the fit rows; unseen levels map to `0.0`.
#[derive(Clone, Debug)]
pub struct Prevalence {
    max_levels: usize,
}

impl Prevalence {
    pub fn new(max_levels: usize) -> Self {
        Self { max_levels }
    }
}

/// Fitted [`Prevalence`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedPrevalence {
    names: Vec<String>,
    shares: BTreeMap<String, f64>,
}

impl ColumnEncoder for Prevalence {
    type Fitted = FittedPrevalence;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        let table = LevelTable::collect(input, self.max_levels)?;
        let n = table.total.count as f64;
        let shares = table
            .levels
            .into_iter()
            .map(|(level, stats)| (level, stats.count as f64 / n))
            .collect();
        Ok(FittedPrevalence {
            names: vec![format!("{}_prevalence", input.column)],
            shares,
        })
    }
}

impl FittedColumnEncoder for FittedPrevalence {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        vec![rows
            .iter()
            .map(|&r| {
                self.shares
                    .get(level_key(data, r).as_ref())
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect()]
    }
}
