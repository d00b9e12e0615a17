//! Missing-value indicator.

use super::{ColumnEncoder, FitInput, FittedColumnEncoder};
use crate::error::EncodeError;
use crate::frame::ColumnData;
use serde::{Deserialize, Serialize};

/// Emits `1.0` where the source value is missing.
///
/// Produces no output when the fit rows contain no missing value.
#[derive(Clone, Copy, Debug, Default)]
pub struct MissingIndicator;

/// Fitted [`MissingIndicator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedMissingIndicator {
    names: Vec<String>,
}

impl ColumnEncoder for MissingIndicator {
    type Fitted = FittedMissingIndicator;

    fn fit(&self, input: &FitInput<'_>) -> Result<Self::Fitted, EncodeError> {
        input.check()?;
        let any_missing = input.rows.iter().any(|&r| input.data.is_missing(r));
        let names = if any_missing {
            vec![format!("{}_missing", input.column)]
        } else {
            Vec::new()
        };
        Ok(FittedMissingIndicator { names })
    }
}

impl FittedColumnEncoder for FittedMissingIndicator {
    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        self.names
            .iter()
            .map(|_| {
                rows.iter()
                    .map(|&r| if data.is_missing(r) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect()
    }
}
