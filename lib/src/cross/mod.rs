//! Cross-frame construction.
//!
//! For every column the builder fits each encoder once on all training rows
//! (the reference fit) and, for y-aware encoders, once per fold on the fold's
//! complement. Each held-out fold is scored only by the encoder that never
//! saw it, so no training row is encoded with its own outcome.
//!
//! With `fold_fit_unsupervised` the outcome-blind encoders that hold fit
//! statistics are cross-fit the same way. Output names always come from the
//! reference fit; a name a fold fit does not produce reads `0.0` on that fold.

use crate::config::{ExecutionMode, TreatmentConfig};
use crate::encoding::{Encoder, EncoderKind, FitInput, FittedColumnEncoder, FittedEncoder};
use crate::error::{Result, TreatmentError};
use crate::folds::FoldPlan;
use crate::frame::{ColumnDescriptor, ColumnKind, Frame, NumericFrame, Outcome};
use serde::{Deserialize, Serialize};

/// Encoders requested for one source column.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    /// Kind the column is treated as (may differ from storage).
    pub treat_as: ColumnKind,
    pub encoders: Vec<Encoder>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, treat_as: ColumnKind, encoders: Vec<Encoder>) -> Self {
        Self {
            name: name.into(),
            treat_as,
            encoders,
        }
    }
}

/// A column that could not be treated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitFailure {
    pub column: String,
    pub reason: String,
}

/// Provenance of a derived column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedColumn {
    pub name: String,
    pub source: String,
    pub encoder: EncoderKind,
    pub y_aware: bool,
}

/// Full-training-set fits for one source column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnTreatment {
    /// Source column as ingested.
    pub descriptor: ColumnDescriptor,
    pub treat_as: ColumnKind,
    pub encoders: Vec<FittedEncoder>,
}

/// Output of [`CrossFrameBuilder::build`].
#[derive(Clone, Debug)]
pub struct CrossFrame {
    /// Bias-corrected training frame, input row order.
    pub frame: NumericFrame,
    /// One entry per column of `frame`, same order.
    pub derived: Vec<DerivedColumn>,
    /// Reference fits, in source column order.
    pub reference: Vec<ColumnTreatment>,
    pub failures: Vec<FitFailure>,
    /// Fold id per row.
    pub fold_of: Vec<usize>,
}

struct ColumnOutput {
    treatment: ColumnTreatment,
    columns: Vec<(DerivedColumn, Vec<f64>)>,
}

/// Drives fold plan and encoders to produce a [`CrossFrame`].
#[derive(Clone, Debug, Default)]
pub struct CrossFrameBuilder {
    execution: ExecutionMode,
    fail_fast: bool,
    fold_fit_unsupervised: bool,
}

impl CrossFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TreatmentConfig) -> Self {
        Self {
            execution: config.execution,
            fail_fast: config.fail_fast,
            fold_fit_unsupervised: config.fold_fit_unsupervised,
        }
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_fold_fit_unsupervised(mut self, enabled: bool) -> Self {
        self.fold_fit_unsupervised = enabled;
        self
    }

    /// Build the cross-frame for `specs`.
    ///
    /// # Errors
    /// - [`TreatmentError::Precondition`] when the frame, outcome and fold
    ///   plan disagree on row count.
    /// - [`TreatmentError::Fit`] for the first failing column in fail-fast
    ///   mode; otherwise failures are collected in [`CrossFrame::failures`].
    pub fn build(
        &self,
        frame: &Frame,
        outcome: &Outcome,
        plan: &FoldPlan,
        specs: &[ColumnSpec],
    ) -> Result<CrossFrame> {
        let n = frame.n_rows();
        if outcome.len() != n || plan.n_rows() != n {
            return Err(TreatmentError::Precondition(format!(
                "frame has {n} rows, outcome {} and fold plan {}",
                outcome.len(),
                plan.n_rows()
            )));
        }
        tracing::info!(
            columns = specs.len(),
            rows = n,
            folds = plan.k(),
            mode = ?self.execution,
            "building cross frame"
        );

        let complements: Vec<Vec<usize>> = (0..plan.k()).map(|f| plan.complement(f)).collect();
        let ctx = BuildContext {
            frame,
            outcome,
            plan,
            complements: &complements,
            fold_fit_unsupervised: self.fold_fit_unsupervised,
        };
        let results = map_columns(self.execution, specs, |spec| ctx.build_column(spec));

        let mut out = CrossFrame {
            frame: NumericFrame::with_rows(n),
            derived: Vec::new(),
            reference: Vec::new(),
            failures: Vec::new(),
            fold_of: plan.assignment().to_vec(),
        };
        for result in results {
            match result {
                Ok(column) => {
                    for (meta, values) in column.columns {
                        out.frame.push_column(meta.name.clone(), values)?;
                        out.derived.push(meta);
                    }
                    out.reference.push(column.treatment);
                }
                Err(failure) if self.fail_fast => {
                    return Err(TreatmentError::Fit {
                        column: failure.column,
                        reason: failure.reason,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        column = %failure.column,
                        reason = %failure.reason,
                        "skipping column"
                    );
                    out.failures.push(failure);
                }
            }
        }

        tracing::info!(
            derived = out.derived.len(),
            failed = out.failures.len(),
            "cross frame built"
        );
        Ok(out)
    }
}

struct BuildContext<'a> {
    frame: &'a Frame,
    outcome: &'a Outcome,
    plan: &'a FoldPlan,
    complements: &'a [Vec<usize>],
    fold_fit_unsupervised: bool,
}

impl BuildContext<'_> {
    fn build_column(&self, spec: &ColumnSpec) -> std::result::Result<ColumnOutput, FitFailure> {
        let fail = |reason: String| FitFailure {
            column: spec.name.clone(),
            reason,
        };
        let column = self
            .frame
            .column(&spec.name)
            .ok_or_else(|| fail("column not found in frame".to_string()))?;
        let data = column.data();
        let n = self.frame.n_rows();
        let all_rows: Vec<usize> = (0..n).collect();

        let mut treatment = ColumnTreatment {
            descriptor: column.descriptor(),
            treat_as: spec.treat_as,
            encoders: Vec::with_capacity(spec.encoders.len()),
        };
        let mut columns = Vec::new();

        for encoder in &spec.encoders {
            let kind = encoder.kind();
            let full = FitInput::new(&spec.name, data, self.outcome, &all_rows);
            let reference = encoder
                .fit(&full)
                .map_err(|e| fail(format!("{kind} encoder: {e}")))?;
            let names = reference.output_names().to_vec();
            if names.is_empty() {
                continue;
            }

            let fold_fit =
                encoder.is_y_aware() || (self.fold_fit_unsupervised && kind.has_fit_state());
            let values = if fold_fit {
                let mut values = vec![vec![0.0; n]; names.len()];
                for fold in 0..self.plan.k() {
                    let held_out = self.plan.rows_in(fold);
                    let input =
                        FitInput::new(&spec.name, data, self.outcome, &self.complements[fold]);
                    let fitted = encoder
                        .fit(&input)
                        .map_err(|e| fail(format!("{kind} encoder, fold {fold}: {e}")))?;
                    let applied = fitted.apply(data, held_out);
                    for (fold_name, fold_values) in fitted.output_names().iter().zip(applied) {
                        // outputs the reference fit lacks are dropped; absent ones stay 0.0
                        if let Some(pos) = names.iter().position(|name| name == fold_name) {
                            for (&row, v) in held_out.iter().zip(fold_values) {
                                values[pos][row] = v;
                            }
                        }
                    }
                }
                values
            } else {
                reference.apply(data, &all_rows)
            };

            for (name, column_values) in names.into_iter().zip(values) {
                columns.push((
                    DerivedColumn {
                        name,
                        source: spec.name.clone(),
                        encoder: kind,
                        y_aware: kind.is_y_aware(),
                    },
                    column_values,
                ));
            }
            treatment.encoders.push(reference);
        }

        tracing::debug!(
            column = %spec.name,
            encoders = treatment.encoders.len(),
            outputs = columns.len(),
            "treated column"
        );
        Ok(ColumnOutput { treatment, columns })
    }
}

#[cfg(feature = "parallel")]
fn map_columns<T, F>(mode: ExecutionMode, specs: &[ColumnSpec], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&ColumnSpec) -> T + Sync + Send,
{
    use rayon::prelude::*;
    match mode {
        ExecutionMode::Sequential => specs.iter().map(f).collect(),
        ExecutionMode::Parallel => specs.par_iter().map(f).collect(),
    }
}

#[cfg(not(feature = "parallel"))]
fn map_columns<T, F>(_mode: ExecutionMode, specs: &[ColumnSpec], f: F) -> Vec<T>
where
    F: Fn(&ColumnSpec) -> T,
{
    specs.iter().map(f).collect()
}
