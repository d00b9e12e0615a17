//! Treatment orchestrator.
//!
//! [`Treatment`] owns the lifecycle `UNFIT → CROSS_BUILT → SCORED → FINALIZED`:
//! it builds the fold plan, the cross-frame, the variable scores, and finally
//! the [`TransformPlan`] used by [`Treatment::transform`].

mod state;

pub use state::TreatmentState;

use crate::config::{FoldStrategy, TreatmentConfig};
use crate::cross::{ColumnSpec, CrossFrameBuilder, FitFailure};
use crate::encoding::{Encoder, EncoderKind};
use crate::error::{Result, TreatmentError};
use crate::folds::{FoldPlan, Stratification};
use crate::frame::{ColumnData, ColumnKind, Frame, NumericFrame, Outcome, OutcomeKind};
use crate::plan::{PlanMetadata, TransformOutput, TransformPlan};
use crate::scoring::{ScoreFrame, VarScorer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An explanatory column left out of the treatment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedColumn {
    pub column: String,
    pub reason: String,
}

/// Summary of a fit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub outcome: String,
    pub n_rows: usize,
    pub folds: usize,
    /// Source columns handed to the cross-frame builder.
    pub columns_considered: usize,
    /// Columns whose encoders failed to fit.
    pub failures: Vec<FitFailure>,
    /// Single-valued columns and columns no configured encoder applies to.
    /// Single-valued columns still reach the score frame through their
    /// outcome-blind encoders, all rejected as [`Rejection::NoRange`].
    ///
    /// [`Rejection::NoRange`]: crate::scoring::Rejection::NoRange
    pub skipped: Vec<SkippedColumn>,
    pub derived_columns: usize,
    pub selected_columns: usize,
}

/// Output of [`Treatment::fit_transform`].
#[derive(Clone, Debug)]
pub struct FitResult {
    /// Cross-validated training frame restricted to the selected columns.
    pub frame: NumericFrame,
    /// Outcome values (0/1 for classification), in row order.
    pub outcome: Vec<f64>,
    pub report: FitReport,
}

/// Designs and applies a leakage-free numeric treatment.
///
/// # Example
/// ```
/// use crossframe::{Frame, Treatment, TreatmentConfig};
///
/// let levels: Vec<&str> = (0..60).map(|i| ["a", "b", "c"][i % 3]).collect();
/// let y: Vec<f64> = (0..60).map(|i| (i % 3) as f64 * 2.0 + (i % 5) as f64 * 0.1).collect();
/// let frame = Frame::builder()
///     .categorical_str("group", &levels)
///     .numeric_f64("y", &y)
///     .build()?;
///
/// let mut treatment = Treatment::new(TreatmentConfig::regression())?;
/// let fit = treatment.fit_transform(&frame, "y")?;
/// assert_eq!(fit.frame.n_rows(), 60);
///
/// let applied = treatment.transform(&frame)?;
/// assert_eq!(applied.frame.column_names(), fit.frame.column_names());
/// # Ok::<(), crossframe::TreatmentError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Treatment {
    config: TreatmentConfig,
    state: TreatmentState,
    fold_plan: Option<FoldPlan>,
    score_frame: Option<ScoreFrame>,
    plan: Option<TransformPlan>,
    report: Option<FitReport>,
}

impl Treatment {
    /// Create an unfit treatment.
    ///
    /// # Errors
    /// [`TreatmentError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: TreatmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TreatmentState::Unfit,
            fold_plan: None,
            score_frame: None,
            plan: None,
            report: None,
        })
    }

    /// Inference-only treatment from a stored plan.
    pub fn from_plan(plan: TransformPlan) -> Self {
        Self {
            config: plan.config().clone(),
            state: TreatmentState::Finalized,
            fold_plan: None,
            score_frame: None,
            plan: Some(plan),
            report: None,
        }
    }

    pub fn config(&self) -> &TreatmentConfig {
        &self.config
    }

    pub fn state(&self) -> TreatmentState {
        self.state
    }

    /// Fold plan of the last fit.
    pub fn fold_plan(&self) -> Option<&FoldPlan> {
        self.fold_plan.as_ref()
    }

    /// Variable scores of the last fit.
    pub fn score_frame(&self) -> Option<&ScoreFrame> {
        self.score_frame.as_ref()
    }

    pub fn report(&self) -> Option<&FitReport> {
        self.report.as_ref()
    }

    /// The finalized plan.
    ///
    /// # Errors
    /// [`TreatmentError::State`] unless FINALIZED.
    pub fn plan(&self) -> Result<&TransformPlan> {
        self.state.require("plan", TreatmentState::Finalized)?;
        self.plan.as_ref().ok_or(TreatmentError::State {
            operation: "plan",
            required: TreatmentState::Finalized.as_str(),
            actual: self.state.as_str(),
        })
    }

    /// Consume the treatment, keeping only its plan.
    pub fn into_plan(self) -> Result<TransformPlan> {
        self.state.require("into_plan", TreatmentState::Finalized)?;
        let actual = self.state.as_str();
        self.plan.ok_or(TreatmentError::State {
            operation: "into_plan",
            required: TreatmentState::Finalized.as_str(),
            actual,
        })
    }

    /// Discard all fitted state.
    pub fn reset(&mut self) {
        self.state = TreatmentState::Unfit;
        self.fold_plan = None;
        self.score_frame = None;
        self.plan = None;
        self.report = None;
    }

    /// Design the treatment and return the cross-validated training frame.
    ///
    /// Prior fits are discarded first. On error the treatment is left UNFIT.
    ///
    /// # Errors
    /// - [`TreatmentError::Precondition`] for an empty frame, a missing or
    ///   incomplete outcome column, no treatable columns, or fewer rows than
    ///   folds.
    /// - [`TreatmentError::Fit`] for a failing column in fail-fast mode.
    pub fn fit_transform(&mut self, frame: &Frame, outcome_column: &str) -> Result<FitResult> {
        self.reset();
        let result = self.run(frame, outcome_column);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Design the treatment, returning only the report.
    pub fn fit(&mut self, frame: &Frame, outcome_column: &str) -> Result<FitReport> {
        self.fit_transform(frame, outcome_column).map(|r| r.report)
    }

    /// Apply the finalized plan to new data.
    ///
    /// Produces the same columns, in the same order, as the training frame.
    ///
    /// # Errors
    /// [`TreatmentError::State`] unless FINALIZED.
    pub fn transform(&self, frame: &Frame) -> Result<TransformOutput> {
        self.state.require("transform", TreatmentState::Finalized)?;
        self.plan()?.apply(frame)
    }

    fn run(&mut self, frame: &Frame, outcome_column: &str) -> Result<FitResult> {
        if frame.is_empty() {
            return Err(TreatmentError::Precondition("frame is empty".to_string()));
        }
        let y_column = frame.column(outcome_column).ok_or_else(|| {
            TreatmentError::Precondition(format!("outcome column '{outcome_column}' not found"))
        })?;
        let outcome = Outcome::from_column(y_column, &self.config.outcome)?;

        let (specs, skipped) = self.column_specs(frame, outcome_column);
        if specs.is_empty() {
            return Err(TreatmentError::Precondition(
                "frame has no treatable explanatory columns".to_string(),
            ));
        }

        let n = frame.n_rows();
        let stratification = match (self.config.fold_strategy, outcome.kind()) {
            (FoldStrategy::Plain, _) => Stratification::None,
            (FoldStrategy::Stratified, OutcomeKind::Regression) => {
                Stratification::ByOrder(outcome.values())
            }
            (FoldStrategy::Stratified, OutcomeKind::BinaryClassification { .. }) => {
                Stratification::ByLabel(outcome.values())
            }
        };
        let fold_plan = FoldPlan::build(n, self.config.folds, stratification, self.config.seed)?;
        tracing::info!(
            outcome = outcome_column,
            rows = n,
            columns = specs.len(),
            folds = fold_plan.k(),
            "designing treatment"
        );

        let cross = CrossFrameBuilder::from_config(&self.config).build(
            frame,
            &outcome,
            &fold_plan,
            &specs,
        )?;
        self.fold_plan = Some(fold_plan);
        self.state.advance(TreatmentState::CrossBuilt)?;

        let scores =
            VarScorer::from_config(&self.config).score(&cross.frame, &outcome, &cross.derived)?;
        self.state.advance(TreatmentState::Scored)?;

        let selected = scores.selected(self.config.filter_to_recommended);
        if selected.is_empty() {
            tracing::warn!("no derived column survived scoring");
        }
        let mut out = NumericFrame::with_rows(n);
        for name in &selected {
            let values = cross.frame.get(name).ok_or_else(|| {
                TreatmentError::Precondition(format!("selected column '{name}' missing"))
            })?;
            out.push_column(name.clone(), values.to_vec())?;
        }

        let report = FitReport {
            outcome: outcome_column.to_string(),
            n_rows: n,
            folds: self.config.folds,
            columns_considered: specs.len(),
            failures: cross.failures,
            skipped,
            derived_columns: cross.derived.len(),
            selected_columns: selected.len(),
        };
        let metadata = PlanMetadata {
            outcome_name: outcome_column.to_string(),
            outcome_mean: outcome.mean(),
            outcome_variance: outcome.variance(),
            n_training_rows: n,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let plan = TransformPlan::new(self.config.clone(), cross.reference, selected, metadata)?;

        self.score_frame = Some(scores);
        self.plan = Some(plan);
        self.report = Some(report.clone());
        self.state.advance(TreatmentState::Finalized)?;
        tracing::info!(
            derived = report.derived_columns,
            selected = report.selected_columns,
            failed = report.failures.len(),
            "treatment finalized"
        );

        Ok(FitResult {
            frame: out,
            outcome: outcome.values().to_vec(),
            report,
        })
    }

    /// Encoder lists per explanatory column, plus the columns left out.
    fn column_specs(
        &self,
        frame: &Frame,
        outcome_column: &str,
    ) -> (Vec<ColumnSpec>, Vec<SkippedColumn>) {
        let settings = self.config.encoder_settings();
        let ignored: HashSet<&str> = self
            .config
            .ignored_columns
            .iter()
            .map(String::as_str)
            .collect();
        let categorical: HashSet<&str> = self
            .config
            .categorical_columns
            .iter()
            .map(String::as_str)
            .collect();

        for name in categorical.iter().chain(ignored.iter()) {
            if frame.column(name).is_none() {
                tracing::warn!(column = %name, "configured column not in frame");
            }
        }

        let mut specs = Vec::new();
        let mut skipped = Vec::new();
        for column in frame.columns() {
            let name = column.name();
            if name == outcome_column || ignored.contains(name) {
                continue;
            }
            let single_valued = !has_two_values(column.data());
            let treat_as = if categorical.contains(name) {
                ColumnKind::Categorical
            } else {
                column.data().kind()
            };
            let has_missing = column.data().missing_count() > 0;
            let encoders: Vec<Encoder> = self
                .config
                .codes
                .iter()
                .filter(|kind| kind.applies_to(treat_as) && kind.supports(&self.config.outcome))
                .filter(|&&kind| kind != EncoderKind::MissingIndicator || has_missing)
                // y-aware fold fits of a constant column vary with the fold alone
                .filter(|kind| !(single_valued && kind.is_y_aware()))
                .map(|&kind| Encoder::new(kind, &settings))
                .collect();
            if single_valued {
                tracing::warn!(column = name, "column has a single value");
                skipped.push(SkippedColumn {
                    column: name.to_string(),
                    reason: "no range".to_string(),
                });
                if !encoders.is_empty() {
                    specs.push(ColumnSpec::new(name, treat_as, encoders));
                }
            } else if encoders.is_empty() {
                tracing::debug!(column = name, kind = treat_as.as_str(), "no encoder applies");
                skipped.push(SkippedColumn {
                    column: name.to_string(),
                    reason: format!("no configured encoder for {} columns", treat_as.as_str()),
                });
            } else {
                specs.push(ColumnSpec::new(name, treat_as, encoders));
            }
        }
        (specs, skipped)
    }
}

/// Whether the column holds at least two distinct values, missing counting
/// as a value.
fn has_two_values(data: &ColumnData) -> bool {
    let mut values = (0..data.len()).map(|row| data.level_at(row));
    let Some(first) = values.next() else {
        return false;
    };
    values.any(|v| v != first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use crate::plan::BinaryFormat;
    use crate::scoring::Rejection;

    const N: usize = 200;

    fn city(i: usize) -> &'static str {
        ["paris", "london", "berlin", "rome"][(i * 7 + i / 3) % 4]
    }

    fn x_value(i: usize) -> Option<f64> {
        if i % 11 == 0 {
            None
        } else {
            Some(((i * 37) % 101) as f64 / 10.0)
        }
    }

    fn training_frame() -> Frame {
        let cities: Vec<&str> = (0..N).map(city).collect();
        let x: Vec<Option<f64>> = (0..N).map(x_value).collect();
        let noise: Vec<&str> = (0..N)
            .map(|i| if (i * 13) % 5 < 2 { "u" } else { "v" })
            .collect();
        let y: Vec<f64> = (0..N)
            .map(|i| {
                let effect = match city(i) {
                    "paris" => 3.0,
                    "london" => -2.0,
                    "berlin" => 1.0,
                    _ => 0.0,
                };
                effect + 0.5 * x_value(i).unwrap_or(5.0) + ((i * 17) % 7) as f64 * 0.1
            })
            .collect();
        Frame::builder()
            .categorical_str("city", &cities)
            .numeric("x", x)
            .categorical_str("noise", &noise)
            .categorical_str("constant", &vec!["same"; N])
            .numeric_f64("y", &y)
            .build()
            .unwrap()
    }

    fn keep_all() -> TreatmentConfig {
        TreatmentConfig::regression()
            .with_filter_to_recommended(false)
            .with_execution(ExecutionMode::Sequential)
    }

    #[test]
    fn test_fit_transform_produces_complete_frame() {
        let frame = training_frame();
        let mut treatment = Treatment::new(TreatmentConfig::regression()).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();

        assert_eq!(treatment.state(), TreatmentState::Finalized);
        assert_eq!(fit.frame.n_rows(), N);
        assert_eq!(fit.outcome.len(), N);
        assert!(!fit.frame.has_missing());
        assert!(fit.frame.get("city_impact").is_some());
        assert!(fit.frame.get("x").is_some());
        assert_eq!(fit.report.columns_considered, 4);
        assert!(fit.report.failures.is_empty());
        assert_eq!(treatment.fold_plan().unwrap().k(), 5);
        assert!(treatment.score_frame().is_some());
    }

    #[test]
    fn test_single_level_column_is_pruned() {
        let frame = training_frame();
        let mut treatment = Treatment::new(keep_all()).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();
        assert!(fit
            .frame
            .column_names()
            .iter()
            .all(|n| !n.starts_with("constant")));
        assert!(fit.report.failures.is_empty());
        assert_eq!(
            fit.report.skipped,
            vec![SkippedColumn {
                column: "constant".to_string(),
                reason: "no range".to_string(),
            }]
        );
        let constant: Vec<_> = treatment
            .score_frame()
            .unwrap()
            .iter()
            .filter(|s| s.source == "constant")
            .collect();
        let names: Vec<&str> = constant.iter().map(|s| s.variable.as_str()).collect();
        assert_eq!(names, ["constant_ind_same", "constant_prevalence"]);
        for score in constant {
            assert!(!score.y_aware);
            assert!(!score.has_range);
            assert_eq!(score.rejection, Some(Rejection::NoRange));
        }
        let plan = treatment.plan().unwrap();
        assert!(plan.columns().iter().all(|c| c.descriptor.name != "constant"));
    }

    #[test]
    fn test_constant_column_without_outcome_blind_encoder() {
        let frame = training_frame();
        let config = keep_all().with_codes([EncoderKind::Impact, EncoderKind::CleanNumeric]);
        let mut treatment = Treatment::new(config).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();
        assert!(fit
            .report
            .skipped
            .iter()
            .any(|s| s.column == "constant" && s.reason == "no range"));
        assert!(treatment
            .score_frame()
            .unwrap()
            .iter()
            .all(|s| s.source != "constant"));
    }

    #[test]
    fn test_transform_matches_training_columns_and_is_idempotent() {
        let frame = training_frame();
        let mut treatment = Treatment::new(TreatmentConfig::regression()).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();

        let first = treatment.transform(&frame).unwrap();
        let second = treatment.transform(&frame).unwrap();
        assert_eq!(first.frame.column_names(), fit.frame.column_names());
        assert_eq!(first, second);
        assert!(first.warnings.is_empty());
        assert!(!first.frame.has_missing());
    }

    #[test]
    fn test_cross_frame_differs_from_plan_on_training_rows() {
        let frame = training_frame();
        let mut treatment = Treatment::new(keep_all()).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();
        let applied = treatment.transform(&frame).unwrap();

        let cross = fit.frame.get("city_impact").unwrap();
        let plan = applied.frame.get("city_impact").unwrap();
        assert!(cross.iter().zip(plan).any(|(a, b)| (a - b).abs() > 1e-9));

        // non-y-aware columns come from the same full-data fit
        assert_eq!(fit.frame.get("x").unwrap(), applied.frame.get("x").unwrap());
    }

    #[test]
    fn test_unseen_level_maps_to_fallback() {
        let frame = training_frame();
        let mut treatment = Treatment::new(keep_all()).unwrap();
        treatment.fit(&frame, "y").unwrap();

        let new_rows = Frame::builder()
            .categorical_str("city", &["atlantis", "paris"])
            .numeric("x", vec![Some(1.0), None])
            .categorical_str("noise", &["u", "w"])
            .categorical_str("constant", &["same", "same"])
            .build()
            .unwrap();
        let out = treatment.transform(&new_rows).unwrap();
        let impact = out.frame.get("city_impact").unwrap();
        assert_eq!(impact[0], 0.0);
        assert!(impact[1] > 0.0);
        assert_eq!(out.frame.get("city_prevalence").unwrap()[0], 0.0);
        assert!(!out.frame.has_missing());
    }

    #[test]
    fn test_transform_before_fit_is_state_error() {
        let treatment = Treatment::new(TreatmentConfig::regression()).unwrap();
        let result = treatment.transform(&training_frame());
        assert!(matches!(
            result,
            Err(TreatmentError::State {
                operation: "transform",
                required: "FINALIZED",
                actual: "UNFIT",
            })
        ));
        assert!(matches!(treatment.plan(), Err(TreatmentError::State { .. })));
        assert!(matches!(
            treatment.into_plan(),
            Err(TreatmentError::State {
                operation: "into_plan",
                required: "FINALIZED",
                actual: "UNFIT",
            })
        ));
    }

    #[test]
    fn test_into_plan_after_fit() {
        let frame = training_frame();
        let mut treatment = Treatment::new(TreatmentConfig::regression()).unwrap();
        treatment.fit(&frame, "y").unwrap();
        let expected = treatment.transform(&frame).unwrap();
        let plan = treatment.into_plan().unwrap();
        assert_eq!(plan.apply(&frame).unwrap().frame, expected.frame);
    }

    #[test]
    fn test_plan_round_trips_reproduce_transform() {
        let frame = training_frame();
        let mut treatment = Treatment::new(TreatmentConfig::regression()).unwrap();
        treatment.fit(&frame, "y").unwrap();
        let expected = treatment.transform(&frame).unwrap();
        let plan = treatment.plan().unwrap();

        let from_json = TransformPlan::from_json(&plan.to_json().unwrap()).unwrap();
        let from_bytes = TransformPlan::from_bytes(&plan.to_bytes().unwrap()).unwrap();
        assert_eq!(&from_bytes, plan);

        for restored in [from_json, from_bytes] {
            let inference = Treatment::from_plan(restored);
            assert_eq!(inference.state(), TreatmentState::Finalized);
            let out = inference.transform(&frame).unwrap();
            assert_eq!(out.frame.column_names(), expected.frame.column_names());
            for (name, values) in expected.frame.iter() {
                let got = out.frame.get(name).unwrap();
                assert!(values.iter().zip(got).all(|(a, b)| (a - b).abs() < 1e-12));
            }
        }
    }

    #[test]
    fn test_preconditions() {
        let frame = training_frame();
        let mut treatment = Treatment::new(TreatmentConfig::regression()).unwrap();

        let missing_outcome = treatment.fit_transform(&frame, "nope");
        assert!(matches!(missing_outcome, Err(TreatmentError::Precondition(_))));

        let outcome_only = Frame::builder().numeric_f64("y", &[1.0, 2.0, 3.0]).build().unwrap();
        let result = treatment.fit_transform(&outcome_only, "y");
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));

        let with_gap = Frame::builder()
            .categorical_str("c", &["a", "b", "a", "b", "a", "b"])
            .numeric("y", vec![Some(1.0), None, Some(2.0), Some(1.0), Some(0.0), Some(3.0)])
            .build()
            .unwrap();
        let result = treatment.fit_transform(&with_gap, "y");
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));

        let tiny = Frame::builder()
            .categorical_str("c", &["a", "b", "a"])
            .numeric_f64("y", &[1.0, 2.0, 3.0])
            .build()
            .unwrap();
        let result = treatment.fit_transform(&tiny, "y");
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));

        let empty = Frame::default();
        assert!(matches!(
            treatment.fit_transform(&empty, "y"),
            Err(TreatmentError::Precondition(_))
        ));
        assert_eq!(treatment.state(), TreatmentState::Unfit);
    }

    #[test]
    fn test_level_cap_failure_is_isolated() {
        let frame = training_frame();
        let config = keep_all().with_max_levels(3);
        let mut treatment = Treatment::new(config.clone()).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();
        assert_eq!(fit.report.failures.len(), 1);
        assert_eq!(fit.report.failures[0].column, "city");
        assert!(fit.frame.get("x").is_some());
        assert!(fit.frame.column_names().iter().all(|n| !n.starts_with("city")));

        let mut strict = Treatment::new(config.with_fail_fast(true)).unwrap();
        let result = strict.fit_transform(&frame, "y");
        assert!(matches!(result, Err(TreatmentError::Fit { ref column, .. }) if column == "city"));
        assert_eq!(strict.state(), TreatmentState::Unfit);
    }

    #[test]
    fn test_ignored_and_categorical_columns() {
        let frame = training_frame();
        let config = keep_all()
            .with_ignored_columns(["noise", "constant"])
            .with_categorical_columns(["x"]);
        let mut treatment = Treatment::new(config).unwrap();
        let fit = treatment.fit_transform(&frame, "y").unwrap();
        let names = fit.frame.column_names();
        assert!(names.iter().all(|n| !n.starts_with("noise")));
        assert!(names.iter().any(|n| n == "x_impact"));
        assert!(names.iter().all(|n| n != "x_score"));
    }

    #[test]
    fn test_binary_classification() {
        let frame = training_frame();
        let labels: Vec<&str> = (0..N)
            .map(|i| if city(i) == "paris" || i % 9 == 0 { "yes" } else { "no" })
            .collect();
        let frame = Frame::builder()
            .column(frame.column("city").unwrap().clone())
            .column(frame.column("x").unwrap().clone())
            .categorical_str("churn", &labels)
            .build()
            .unwrap();

        let mut treatment = Treatment::new(TreatmentConfig::binary_classification("yes")).unwrap();
        let fit = treatment.fit_transform(&frame, "churn").unwrap();
        assert!(fit.outcome.iter().all(|&v| v == 0.0 || v == 1.0));
        assert!(fit.frame.get("city_impact").is_some());
        assert!(fit.frame.get("city_deviation").is_none());
        let score = treatment.score_frame().unwrap().get("city_impact").unwrap();
        assert!(score.recommended);
    }

    #[test]
    fn test_refit_discards_previous_plan() {
        let frame = training_frame();
        let mut treatment = Treatment::new(keep_all()).unwrap();
        treatment.fit(&frame, "y").unwrap();
        assert!(treatment.plan().unwrap().source_columns().contains(&"city"));

        let narrow = Frame::builder()
            .column(frame.column("x").unwrap().clone())
            .column(frame.column("y").unwrap().clone())
            .build()
            .unwrap();
        treatment.fit(&narrow, "y").unwrap();
        assert_eq!(treatment.plan().unwrap().source_columns(), vec!["x"]);

        treatment.reset();
        assert_eq!(treatment.state(), TreatmentState::Unfit);
        assert!(treatment.transform(&frame).is_err());
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let frame = training_frame();
        let mut a = Treatment::new(TreatmentConfig::regression()).unwrap();
        let mut b = Treatment::new(TreatmentConfig::regression()).unwrap();
        let fa = a.fit_transform(&frame, "y").unwrap();
        let fb = b.fit_transform(&frame, "y").unwrap();
        assert_eq!(fa.frame, fb.frame);
    }
}
