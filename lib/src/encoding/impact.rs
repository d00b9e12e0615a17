//! Impact coding: smoothed, centered per-level outcome effect.

use super::levels::{centered_estimate, level_key, LevelTable};
use super::{ColumnEncoder, FitInput, FittedColumnEncoder};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Y-aware encoder mapping each level to its shrunk deviation from the grand
/// mean (regression) or its log-odds shift (binary classification).
///
/// Levels not seen during fit map to `0.0`, the grand mean on the centered
/// scale.
#[derive(Clone, Debug)]
pub struct Impact {
    smoothing: f64,
    max_levels: usize,
}

impl Impact {
    pub fn new(smoothing: f64, max_levels: usize) -> Self {
        Self {
            smoothing,
            max_levels,
        }
    }
}

/// Fitted [`Impact`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedImpact {
    names: Vec<String>,
    effects: BTreeMap<String, f64>,
    /// Fit-set outcome mean (positive rate for classification).
    grand_mean: f64,
    fallback: f64,
}

impl FittedImpact {
    pub fn effect(&self, level: &str) -> Option<f64> {
        self.effects.get(level).copied()
    }

    pub fn grand_mean(&self) -> f64 {
        self.grand_mean
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }
}

impl ColumnEncoder for Impact {
    type Fitted = FittedImpact;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        let table = LevelTable::collect(input, self.max_levels)?;
        let grand_mean = table.total.mean();
        let classification = input.outcome.kind().is_classification();

        let effects = table
            .levels
            .iter()
            .map(|(level, stats)| {
                (
                    level.clone(),
                    centered_estimate(stats, grand_mean, self.smoothing, classification),
                )
            })
            .collect();

        Ok(FittedImpact {
            names: vec![format!("{}_impact", input.column)],
            effects,
            grand_mean,
            fallback: 0.0,
        })
    }
}

impl FittedColumnEncoder for FittedImpact {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        vec![rows
            .iter()
            .map(|&r| {
                self.effects
                    .get(level_key(data, r).as_ref())
                    .copied()
                    .unwrap_or(self.fallback)
            })
            .collect()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Outcome;

    #[test]
    fn test_regression_effects() {
        // a: 1, 3   b: 5, 7   grand mean 4
        let data = ColumnData::categorical(vec![Some("a"), Some("a"), Some("b"), Some("b")]);
        let outcome = Outcome::regression("y", vec![1.0, 3.0, 5.0, 7.0]).unwrap();
        let rows = [0, 1, 2, 3];
        let fitted = Impact::new(1.0, 100)
            .fit(&FitInput::new("c", &data, &outcome, &rows))
            .unwrap();
        // (4 + 4) / 3 - 4 = -4/3
        assert!((fitted.effect("a").unwrap() + 4.0 / 3.0).abs() < 1e-12);
        assert!((fitted.effect("b").unwrap() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(fitted.grand_mean(), 4.0);
    }

    #[test]
    fn test_unseen_level_uses_fallback() {
        let data = ColumnData::categorical(vec![Some("a"), Some("b")]);
        let outcome = Outcome::regression("y", vec![1.0, 2.0]).unwrap();
        let rows = [0, 1];
        let fitted = Impact::new(1.0, 100)
            .fit(&FitInput::new("c", &data, &outcome, &rows))
            .unwrap();
        let new_data = ColumnData::categorical(vec![Some("zzz"), None]);
        assert_eq!(fitted.apply_all(&new_data), vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn test_missing_forms_own_level() {
        let data = ColumnData::categorical(vec![None, None, Some("a"), Some("a")]);
        let outcome = Outcome::regression("y", vec![10.0, 10.0, 0.0, 0.0]).unwrap();
        let rows = [0, 1, 2, 3];
        let fitted = Impact::new(0.0, 100)
            .fit(&FitInput::new("c", &data, &outcome, &rows))
            .unwrap();
        let values = fitted.apply_all(&data);
        assert_eq!(values[0], vec![5.0, 5.0, -5.0, -5.0]);
    }

    #[test]
    fn test_classification_log_odds() {
        let data = ColumnData::categorical(vec![Some("a"), Some("a"), Some("b"), Some("b")]);
        let outcome = Outcome::binary("y", &[true, true, false, true], "yes");
        let rows = [0, 1, 2, 3];
        let fitted = Impact::new(1.0, 100)
            .fit(&FitInput::new("c", &data, &outcome, &rows))
            .unwrap();
        let a = fitted.effect("a").unwrap();
        let b = fitted.effect("b").unwrap();
        assert!(a > 0.0);
        assert!(b < 0.0);
        // p_a = (2 + 0.75) / 3
        let logit = |p: f64| (p / (1.0 - p)).ln();
        assert!((a - (logit(2.75 / 3.0) - logit(0.75))).abs() < 1e-12);
    }
}
