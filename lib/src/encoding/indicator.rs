//! One-hot indicators for categorical levels.
//!
//! Learns the levels present in the fit rows and emits one `0/1` column per
//! level that occurs at least `min_count` times. Missing values and levels not
//! seen during fit produce an all-zero row.
//!
//! # Example
//! ```
//! use crossframe::encoding::{ColumnEncoder, FitInput, FittedColumnEncoder, Indicator};
//! use crossframe::frame::{ColumnData, Outcome};
//!
//! let data = ColumnData::categorical(vec![Some("red"), Some("blue"), Some("red"), Some("blue")]);
//! let outcome = Outcome::regression("y", vec![0.0; 4]).unwrap();
//! let rows = [0, 1, 2, 3];
//!
//! let fitted = Indicator::new(1, 100)
//!     .fit(&FitInput::new("color", &data, &outcome, &rows))
//!     .unwrap();
//! assert_eq!(fitted.output_names(), &["color_ind_blue", "color_ind_red"]);
//! ```

use super::levels::{dedup_names, level_key, sanitize_level, LevelTable, NA_LEVEL};
use super::{ColumnEncoder, FitInput, FittedColumnEncoder};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One-hot encoder for a categorical column.
#[derive(Clone, Debug)]
pub struct Indicator {
    min_count: usize,
    max_levels: usize,
}

impl Indicator {
    pub fn new(min_count: usize, max_levels: usize) -> Self {
        Self {
            min_count: min_count.max(1),
            max_levels,
        }
    }
}

/// Fitted [`Indicator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedIndicator {
    /// Indicated levels, parallel to `names`.
    levels: Vec<String>,
    names: Vec<String>,
}

impl FittedIndicator {
    /// Levels that received an indicator column.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }
}

impl ColumnEncoder for Indicator {
    type Fitted = FittedIndicator;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        let table = LevelTable::collect(input, self.max_levels)?;

        let levels: Vec<String> = table
            .levels
            .into_iter()
            .filter(|(level, stats)| level != NA_LEVEL && stats.count >= self.min_count)
            .map(|(level, _)| level)
            .collect();
        let names = dedup_names(
            levels
                .iter()
                .map(|l| format!("{}_ind_{}", input.column, sanitize_level(l)))
                .collect(),
        );

        tracing::debug!(
            column = input.column,
            indicators = levels.len(),
            "fitted indicator encoder"
        );
        Ok(FittedIndicator { levels, names })
    }
}

impl FittedColumnEncoder for FittedIndicator {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        let index: HashMap<&str, usize> = self
            .levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let mut out = vec![vec![0.0; rows.len()]; self.levels.len()];
        for (i, &row) in rows.iter().enumerate() {
            if data.is_missing(row) {
                continue;
            }
            if let Some(&col) = index.get(level_key(data, row).as_ref()) {
                out[col][i] = 1.0;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Outcome;

    fn fit(values: Vec<Option<&str>>, min_count: usize) -> (FittedIndicator, ColumnData) {
        let data = ColumnData::categorical(values);
        let outcome = Outcome::regression("y", vec![0.0; data.len()]).unwrap();
        let rows: Vec<usize> = (0..data.len()).collect();
        let fitted = Indicator::new(min_count, 100)
            .fit(&FitInput::new("c", &data, &outcome, &rows))
            .unwrap();
        (fitted, data)
    }

    #[test]
    fn test_rare_levels_dropped() {
        let (fitted, data) = fit(vec![Some("a"), Some("a"), Some("b"), None], 2);
        assert_eq!(fitted.levels(), &["a".to_string()]);
        assert_eq!(fitted.apply_all(&data), vec![vec![1.0, 1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_unseen_level_is_all_zero() {
        let (fitted, _) = fit(vec![Some("a"), Some("b")], 1);
        let new_data = ColumnData::categorical(vec![Some("z"), Some("b")]);
        assert_eq!(
            fitted.apply_all(&new_data),
            vec![vec![0.0, 0.0], vec![0.0, 1.0]]
        );
    }

    #[test]
    fn test_sanitized_names_are_unique() {
        let (fitted, _) = fit(vec![Some("a b"), Some("a-b")], 1);
        assert_eq!(fitted.output_names(), &["c_ind_a_b".to_string(), "c_ind_a_b_2".to_string()]);
    }

    #[test]
    fn test_too_many_levels() {
        let data = ColumnData::categorical(vec![Some("a"), Some("b"), Some("c")]);
        let outcome = Outcome::regression("y", vec![0.0; 3]).unwrap();
        let rows = [0, 1, 2];
        let result = Indicator::new(1, 2).fit(&FitInput::new("c", &data, &outcome, &rows));
        assert!(matches!(result, Err(EncodeError::TooManyLevels { .. })));
    }
}
