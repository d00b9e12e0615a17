//! Binned outcome score for numeric columns.

use super::levels::{centered_estimate, LevelStats};
use super::{ColumnEncoder, FitInput, FittedColumnEncoder};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use crate::stats::quantile_sorted;
use serde::{Deserialize, Serialize};

/// Y-aware encoder for numeric columns.
///
/// Missing values are imputed with the fit-set mean, values are binned on
/// fit-set quantiles, and each bin maps to its smoothed, centered outcome
/// estimate (the same shrinkage as impact coding).
#[derive(Clone, Debug)]
pub struct NumericScore {
    bins: usize,
    smoothing: f64,
}

impl NumericScore {
    pub fn new(bins: usize, smoothing: f64) -> Self {
        Self {
            bins: bins.max(1),
            smoothing,
        }
    }
}

/// Fitted [`NumericScore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedNumericScore {
    names: Vec<String>,
    /// Interior bin edges, strictly increasing.
    edges: Vec<f64>,
    /// One estimate per bin (`edges.len() + 1`).
    estimates: Vec<f64>,
    fill: f64,
}

impl FittedNumericScore {
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    fn bin_of(&self, x: f64) -> usize {
        self.edges.partition_point(|&e| e <= x)
    }
}

impl ColumnEncoder for NumericScore {
    type Fitted = FittedNumericScore;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        let y = input.outcome.values();
        let present = input.present_numbers();
        let fill = if present.is_empty() {
            0.0
        } else {
            present.iter().sum::<f64>() / present.len() as f64
        };

        let xs: Vec<f64> = input
            .rows
            .iter()
            .map(|&r| input.data.numeric_at(r).unwrap_or(fill))
            .collect();
        let mut sorted = xs.clone();
        sorted.sort_by(f64::total_cmp);

        let mut edges: Vec<f64> = (1..self.bins)
            .map(|i| quantile_sorted(&sorted, i as f64 / self.bins as f64))
            .collect();
        edges.dedup();

        let mut fitted = FittedNumericScore {
            names: vec![format!("{}_score", input.column)],
            edges,
            estimates: Vec::new(),
            fill,
        };

        let mut bins = vec![LevelStats::default(); fitted.edges.len() + 1];
        let mut total = LevelStats::default();
        for (&x, &row) in xs.iter().zip(input.rows) {
            bins[fitted.bin_of(x)].push(y[row]);
            total.push(y[row]);
        }
        let grand = total.mean();
        let classification = input.outcome.kind().is_classification();
        fitted.estimates = bins
            .iter()
            .map(|stats| {
                if stats.count == 0 {
                    0.0
                } else {
                    centered_estimate(stats, grand, self.smoothing, classification)
                }
            })
            .collect();

        Ok(fitted)
    }
}

impl FittedColumnEncoder for FittedNumericScore {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        vec![rows
            .iter()
            .map(|&r| {
                let x = data.numeric_at(r).unwrap_or(self.fill);
                self.estimates[self.bin_of(x)]
            })
            .collect()]
    }
}
