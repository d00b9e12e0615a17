//! Inference-time transform plan.
//!
//! A [`TransformPlan`] holds the full-training-set fit of every encoder that
//! produced at least one surviving column, the surviving column names in
//! cross-frame order, and metadata describing the training run. Applying it
//! to new data reproduces the training column set exactly.

mod persist;

pub use persist::BinaryFormat;

use crate::config::TreatmentConfig;
use crate::cross::ColumnTreatment;
use crate::encoding::FittedColumnEncoder;
use crate::error::{Result, TreatmentError};
use crate::frame::{ColumnData, ColumnKind, Frame, NumericFrame};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Training-run metadata stored with a plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub outcome_name: String,
    /// Training outcome mean (positive rate for classification).
    pub outcome_mean: f64,
    /// Training outcome population variance.
    pub outcome_variance: f64,
    pub n_training_rows: usize,
    pub crate_version: String,
}

/// Non-fatal schema difference found while applying a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaWarning {
    /// An expected source column is absent; it is treated as all-missing.
    MissingColumn { column: String },
    /// A source column has a different storage kind than at fit time.
    KindCoerced {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },
}

impl std::fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaWarning::MissingColumn { column } => {
                write!(f, "column '{column}' is missing; treated as all-missing")
            }
            SchemaWarning::KindCoerced {
                column,
                expected,
                found,
            } => write!(
                f,
                "column '{column}' is {} but was {} at fit time; coerced",
                found.as_str(),
                expected.as_str()
            ),
        }
    }
}

/// Result of applying a plan.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformOutput {
    pub frame: NumericFrame,
    pub warnings: Vec<SchemaWarning>,
}

/// Serializable inference-time treatment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformPlan {
    config: TreatmentConfig,
    columns: Vec<ColumnTreatment>,
    selected: Vec<String>,
    metadata: PlanMetadata,
}

impl TransformPlan {
    /// Build a plan from reference fits, keeping only encoders with at least
    /// one output in `selected`.
    ///
    /// # Errors
    /// [`TreatmentError::Precondition`] when a selected name is not produced
    /// by any reference encoder.
    pub fn new(
        config: TreatmentConfig,
        reference: Vec<ColumnTreatment>,
        selected: Vec<String>,
        metadata: PlanMetadata,
    ) -> Result<Self> {
        let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let mut produced: HashSet<String> = HashSet::new();
        let mut columns = Vec::new();
        for mut column in reference {
            column.encoders.retain(|enc| {
                enc.output_names()
                    .iter()
                    .any(|name| wanted.contains(name.as_str()))
            });
            if column.encoders.is_empty() {
                continue;
            }
            for enc in &column.encoders {
                produced.extend(enc.output_names().iter().cloned());
            }
            columns.push(column);
        }
        if let Some(name) = selected.iter().find(|n| !produced.contains(n.as_str())) {
            return Err(TreatmentError::Precondition(format!(
                "selected column '{name}' is not produced by any fitted encoder"
            )));
        }
        Ok(Self {
            config,
            columns,
            selected,
            metadata,
        })
    }

    pub fn config(&self) -> &TreatmentConfig {
        &self.config
    }

    /// Planned source columns and their fitted encoders.
    pub fn columns(&self) -> &[ColumnTreatment] {
        &self.columns
    }

    /// Output column names, in output order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn metadata(&self) -> &PlanMetadata {
        &self.metadata
    }

    /// Names of the source columns the plan reads.
    pub fn source_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.descriptor.name.as_str())
            .collect()
    }

    /// Apply the plan to `frame`.
    ///
    /// Columns the plan does not read (including the outcome) are ignored.
    /// Missing source columns are treated as all-missing and kind differences
    /// are coerced; both are reported as [`SchemaWarning`]s.
    pub fn apply(&self, frame: &Frame) -> Result<TransformOutput> {
        let n = frame.n_rows();
        let rows: Vec<usize> = (0..n).collect();
        let wanted: HashSet<&str> = self.selected.iter().map(String::as_str).collect();
        let mut warnings = Vec::new();
        let mut outputs: HashMap<String, Vec<f64>> = HashMap::with_capacity(self.selected.len());

        for column in &self.columns {
            let expected = &column.descriptor;
            let placeholder;
            let data = match frame.column(&expected.name) {
                Some(found) => {
                    let kind = found.data().kind();
                    if kind != expected.kind {
                        warnings.push(SchemaWarning::KindCoerced {
                            column: expected.name.clone(),
                            expected: expected.kind,
                            found: kind,
                        });
                    }
                    found.data()
                }
                None => {
                    warnings.push(SchemaWarning::MissingColumn {
                        column: expected.name.clone(),
                    });
                    placeholder = all_missing(expected.kind, n);
                    &placeholder
                }
            };

            for encoder in &column.encoders {
                let values = encoder.apply(data, &rows);
                for (name, v) in encoder.output_names().iter().zip(values) {
                    if wanted.contains(name.as_str()) {
                        outputs.insert(name.clone(), v);
                    }
                }
            }
        }

        for warning in &warnings {
            tracing::warn!(%warning, "schema mismatch");
        }

        let mut out = NumericFrame::with_rows(n);
        for name in &self.selected {
            let values = outputs.remove(name).ok_or_else(|| {
                TreatmentError::Precondition(format!("plan produced no values for '{name}'"))
            })?;
            out.push_column(name.clone(), values)?;
        }
        tracing::debug!(rows = n, cols = out.n_cols(), "applied transform plan");
        Ok(TransformOutput {
            frame: out,
            warnings,
        })
    }
}

fn all_missing(kind: ColumnKind, n: usize) -> ColumnData {
    match kind {
        ColumnKind::Numeric => ColumnData::Numeric(vec![None; n]),
        ColumnKind::Categorical => ColumnData::Categorical(vec![None; n]),
    }
}
