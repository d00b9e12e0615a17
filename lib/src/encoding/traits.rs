//! Core traits for column encoders.
//!
//! - [`ColumnEncoder`]: unfitted settings; learns from a row subset.
//! - [`FittedColumnEncoder`]: immutable learned state, applied to any rows.

use super::FitInput;
use crate::error::EncodeError;
use crate::frame::ColumnData;

/// Unfitted encoder for a single source column.
///
/// An encoder fits on whatever rows it is handed; it knows nothing about
/// folds. Refitting produces a new fitted value and never mutates `self`.
pub trait ColumnEncoder: Clone {
    /// The fitted encoder type.
    type Fitted: FittedColumnEncoder;

    /// Learn level/bin statistics from `input.rows`.
    ///
    /// # Errors
    /// Returns [`EncodeError`] if the row set is empty, the column and outcome
    /// lengths disagree, or the column exceeds the level cap.
    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError>;
}

/// Fitted encoder ready to produce derived columns.
pub trait FittedColumnEncoder: Clone {
    /// Output column names, in the order `apply` returns them.
    fn output_names(&self) -> &[String];

    /// Produce one vector per output column for the given rows.
    ///
    /// Unseen levels and missing values map to the recorded fallbacks, so the
    /// result never contains missing values.
    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>>;

    /// Apply to every row of `data`.
    fn apply_all(&self, data: &ColumnData) -> Vec<Vec<f64>> {
        let rows: Vec<usize> = (0..data.len()).collect();
        self.apply(data, &rows)
    }

    fn n_outputs(&self) -> usize {
        self.output_names().len()
    }
}
