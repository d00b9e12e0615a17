//! Numeric passthrough with imputation.

use super::{ColumnEncoder, FitInput, FittedColumnEncoder, ImputeStrategy};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use serde::{Deserialize, Serialize};

/// Passes numeric values through, filling missing entries.
#[derive(Clone, Debug, Default)]
pub struct CleanNumeric {
    strategy: ImputeStrategy,
}

impl CleanNumeric {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }
}

/// Fitted [`CleanNumeric`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedCleanNumeric {
    names: Vec<String>,
    strategy: ImputeStrategy,
    fill: f64,
}

impl FittedCleanNumeric {
    /// Value substituted for missing entries.
    pub fn fill(&self) -> f64 {
        self.fill
    }
}

impl ColumnEncoder for CleanNumeric {
    type Fitted = FittedCleanNumeric;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        let present = input.present_numbers();
        let fill = self.strategy.fill_value(&present);
        Ok(FittedCleanNumeric {
            names: vec![input.column.to_string()],
            strategy: self.strategy,
            fill,
        })
    }
}

impl FittedColumnEncoder for FittedCleanNumeric {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        vec![rows
            .iter()
            .map(|&r| data.numeric_at(r).unwrap_or(self.fill))
            .collect()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Outcome;

    #[test]
    fn test_mean_imputation_from_fit_rows() {
        let data = ColumnData::numeric(vec![Some(1.0), None, Some(3.0), Some(100.0)]);
        let outcome = Outcome::regression("y", vec![0.0; 4]).unwrap();
        // row 3 is outside the fit set
        let rows = [0, 1, 2];
        let fitted = CleanNumeric::default()
            .fit(&FitInput::new("x", &data, &outcome, &rows))
            .unwrap();
        assert_eq!(fitted.fill(), 2.0);
        assert_eq!(fitted.apply_all(&data), vec![vec![1.0, 2.0, 3.0, 100.0]]);
        assert_eq!(fitted.output_names(), &["x".to_string()]);
    }

    #[test]
    fn test_all_missing_is_constant_zero() {
        let data = ColumnData::numeric(vec![None, None]);
        let outcome = Outcome::regression("y", vec![0.0, 1.0]).unwrap();
        let rows = [0, 1];
        let fitted = CleanNumeric::new(ImputeStrategy::Median)
            .fit(&FitInput::new("x", &data, &outcome, &rows))
            .unwrap();
        assert_eq!(fitted.apply_all(&data), vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn test_categorical_text_is_coerced() {
        let fitted = FittedCleanNumeric {
            names: vec!["x".into()],
            strategy: ImputeStrategy::Mean,
            fill: 5.0,
        };
        let data = ColumnData::categorical(vec![Some("2.5"), Some("abc")]);
        assert_eq!(fitted.apply_all(&data), vec![vec![2.5, 5.0]]);
    }
}
