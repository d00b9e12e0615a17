//! Outcome ("y") column handling.

use super::{format_level, Column, ColumnData};
use crate::error::{Result, TreatmentError};
use serde::{Deserialize, Serialize};

/// Task type of the outcome column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Real-valued outcome.
    Regression,
    /// Two-class outcome; rows whose value equals `positive` are the positive class.
    BinaryClassification { positive: String },
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Regression => "regression",
            OutcomeKind::BinaryClassification { .. } => "binary classification",
        }
    }

    pub fn is_classification(&self) -> bool {
        matches!(self, OutcomeKind::BinaryClassification { .. })
    }
}

/// Fully present outcome values.
///
/// Classification outcomes are stored as `0.0` / `1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    name: String,
    values: Vec<f64>,
    kind: OutcomeKind,
}

impl Outcome {
    /// Regression outcome from finite values.
    pub fn regression(name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if let Some(row) = values.iter().position(|v| !v.is_finite()) {
            return Err(TreatmentError::Precondition(format!(
                "outcome '{name}' has a missing or non-finite value at row {row}"
            )));
        }
        Ok(Self {
            name,
            values,
            kind: OutcomeKind::Regression,
        })
    }

    /// Binary outcome from labels.
    pub fn binary(name: impl Into<String>, labels: &[bool], positive: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: labels.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
            kind: OutcomeKind::BinaryClassification {
                positive: positive.into(),
            },
        }
    }

    /// Extract the outcome from a frame column.
    pub fn from_column(column: &Column, kind: &OutcomeKind) -> Result<Self> {
        let data = column.data();
        if let Some(row) = (0..data.len()).find(|&r| data.is_missing(r)) {
            return Err(TreatmentError::Precondition(format!(
                "outcome '{}' has a missing value at row {row}",
                column.name()
            )));
        }

        let values = match kind {
            OutcomeKind::Regression => {
                let mut values = Vec::with_capacity(data.len());
                for row in 0..data.len() {
                    let v = data.numeric_at(row).ok_or_else(|| {
                        TreatmentError::Precondition(format!(
                            "outcome '{}' is not numeric at row {row}",
                            column.name()
                        ))
                    })?;
                    values.push(v);
                }
                values
            }
            OutcomeKind::BinaryClassification { positive } => {
                let target = match data {
                    ColumnData::Numeric(_) => positive
                        .trim()
                        .parse::<f64>()
                        .map(format_level)
                        .unwrap_or_else(|_| positive.clone()),
                    ColumnData::Categorical(_) => positive.clone(),
                };
                (0..data.len())
                    .map(|row| match data.level_at(row) {
                        Some(level) if level == target.as_str() => 1.0,
                        _ => 0.0,
                    })
                    .collect()
            }
        };

        let outcome = Self {
            name: column.name().to_string(),
            values,
            kind: kind.clone(),
        };
        if kind.is_classification() {
            let positives = outcome.values.iter().filter(|&&v| v > 0.5).count();
            if positives == 0 || positives == outcome.len() {
                tracing::warn!(
                    outcome = %outcome.name,
                    positives,
                    rows = outcome.len(),
                    "binary outcome has a single class"
                );
            }
        }
        Ok(outcome)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn kind(&self) -> &OutcomeKind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Grand mean (positive rate for classification).
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.values.len() as f64
    }

    /// Same kind and name with values permuted or replaced, used by tests and resampling.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.values.len() {
            return Err(TreatmentError::Precondition(format!(
                "replacement outcome has {} rows, expected {}",
                values.len(),
                self.values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TreatmentError::Precondition(
                "replacement outcome has non-finite values".to_string(),
            ));
        }
        Ok(Self {
            name: self.name.clone(),
            values,
            kind: self.kind.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_rejects_nan() {
        let result = Outcome::regression("y", vec![1.0, f64::NAN]);
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));
    }

    #[test]
    fn test_from_column_missing_value() {
        let col = Column::new("y", ColumnData::numeric(vec![Some(1.0), None]));
        let result = Outcome::from_column(&col, &OutcomeKind::Regression);
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));
    }

    #[test]
    fn test_from_column_binary_categorical() {
        let col = Column::new(
            "churn",
            ColumnData::categorical(vec![Some("yes"), Some("no"), Some("yes")]),
        );
        let kind = OutcomeKind::BinaryClassification {
            positive: "yes".to_string(),
        };
        let outcome = Outcome::from_column(&col, &kind).unwrap();
        assert_eq!(outcome.values(), &[1.0, 0.0, 1.0]);
        assert!((outcome.mean() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_column_binary_numeric() {
        let col = Column::new("y", ColumnData::from_f64(&[1.0, 0.0, 1.0, 1.0]));
        let kind = OutcomeKind::BinaryClassification {
            positive: "1.0".to_string(),
        };
        let outcome = Outcome::from_column(&col, &kind).unwrap();
        assert_eq!(outcome.values(), &[1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_mean_and_variance() {
        let outcome = Outcome::regression("y", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((outcome.mean() - 2.5).abs() < 1e-12);
        assert!((outcome.variance() - 1.25).abs() < 1e-12);
    }
}
