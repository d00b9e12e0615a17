//! Treatment configuration.

use crate::encoding::{EncoderKind, EncoderSettings, ImputeStrategy};
use crate::error::{Result, TreatmentError};
use crate::frame::OutcomeKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// How the fold plan balances rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldStrategy {
    /// Seeded shuffle.
    Plain,
    /// By label for classification, by outcome order for regression.
    #[default]
    Stratified,
}

/// Scheduling of per-column fits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    Sequential,
    /// Rayon pool; sequential when the `parallel` feature is disabled.
    #[default]
    Parallel,
}

/// Configuration for [`Treatment`](crate::Treatment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentConfig {
    /// Outcome task type.
    pub outcome: OutcomeKind,

    /// Number of cross-validation folds (at least 2).
    pub folds: usize,

    pub fold_strategy: FoldStrategy,

    /// Seed for the fold plan.
    pub seed: u64,

    /// Family-wise significance budget, divided by the number of candidates.
    pub significance_threshold: f64,

    /// Keep only recommended columns (otherwise every column with range).
    pub filter_to_recommended: bool,

    /// Reject a y-aware column that ties a recommended non-y-aware sibling.
    pub prefer_simpler: bool,

    /// Absolute statistic difference counted as a tie.
    pub tie_tolerance: f64,

    /// Minimum level count for an indicator column.
    pub min_indicator_count: usize,

    /// Pseudo-count shrinking level estimates toward the grand mean.
    pub smoothing: f64,

    /// Quantile bins for numeric scores.
    pub numeric_bins: usize,

    pub imputation: ImputeStrategy,

    /// Encoder kinds to produce.
    pub codes: BTreeSet<EncoderKind>,

    /// Categorical columns with more distinct levels fail to fit.
    pub max_levels: usize,

    /// Numeric columns to treat as categorical.
    pub categorical_columns: Vec<String>,

    /// Columns left out of the treatment.
    pub ignored_columns: Vec<String>,

    pub execution: ExecutionMode,

    /// Abort on the first column that fails to fit.
    pub fail_fast: bool,

    /// Fit non-y-aware encoders per fold as well. Missing indicators hold
    /// no fit statistics and keep their reference values.
    pub fold_fit_unsupervised: bool,
}

impl Default for TreatmentConfig {
    fn default() -> Self {
        let settings = EncoderSettings::default();
        Self {
            outcome: OutcomeKind::Regression,
            folds: 5,
            fold_strategy: FoldStrategy::default(),
            seed: 2024,
            significance_threshold: 1.0,
            filter_to_recommended: true,
            prefer_simpler: true,
            tie_tolerance: 1e-9,
            min_indicator_count: settings.min_indicator_count,
            smoothing: settings.smoothing,
            numeric_bins: settings.numeric_bins,
            imputation: settings.imputation,
            codes: EncoderKind::ALL.into_iter().collect(),
            max_levels: settings.max_levels,
            categorical_columns: Vec::new(),
            ignored_columns: Vec::new(),
            execution: ExecutionMode::default(),
            fail_fast: false,
            fold_fit_unsupervised: false,
        }
    }
}

impl TreatmentConfig {
    /// Defaults for a real-valued outcome.
    pub fn regression() -> Self {
        Self::default()
    }

    /// Defaults for a two-class outcome with the given positive value.
    pub fn binary_classification(positive: impl Into<String>) -> Self {
        Self {
            outcome: OutcomeKind::BinaryClassification {
                positive: positive.into(),
            },
            ..Default::default()
        }
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_fold_strategy(mut self, strategy: FoldStrategy) -> Self {
        self.fold_strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    pub fn with_filter_to_recommended(mut self, filter: bool) -> Self {
        self.filter_to_recommended = filter;
        self
    }

    pub fn with_prefer_simpler(mut self, prefer: bool) -> Self {
        self.prefer_simpler = prefer;
        self
    }

    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    pub fn with_min_indicator_count(mut self, count: usize) -> Self {
        self.min_indicator_count = count;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_numeric_bins(mut self, bins: usize) -> Self {
        self.numeric_bins = bins;
        self
    }

    pub fn with_imputation(mut self, strategy: ImputeStrategy) -> Self {
        self.imputation = strategy;
        self
    }

    /// Restrict the produced encoder kinds.
    pub fn with_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = EncoderKind>,
    {
        self.codes = codes.into_iter().collect();
        self
    }

    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignored_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_columns = columns.into_iter().map(Into::into).collect();
        self
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

    /// Encoder hyperparameters derived from this configuration.
    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            smoothing: self.smoothing,
            min_indicator_count: self.min_indicator_count,
            numeric_bins: self.numeric_bins,
            imputation: self.imputation,
            max_levels: self.max_levels,
        }
    }

    /// Check every field once.
    ///
    /// # Errors
    /// [`TreatmentError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TreatmentError::InvalidConfig(msg));

        if self.folds < 2 {
            return invalid(format!("folds must be at least 2, got {}", self.folds));
        }
        if let OutcomeKind::BinaryClassification { positive } = &self.outcome {
            if positive.trim().is_empty() {
                return invalid("positive outcome value must not be empty".to_string());
            }
        }
        if !(self.significance_threshold.is_finite() && self.significance_threshold > 0.0) {
            return invalid(format!(
                "significance_threshold must be positive, got {}",
                self.significance_threshold
            ));
        }
        if !(self.tie_tolerance.is_finite() && self.tie_tolerance >= 0.0) {
            return invalid(format!(
                "tie_tolerance must be non-negative, got {}",
                self.tie_tolerance
            ));
        }
        if !(self.smoothing.is_finite() && self.smoothing >= 0.0) {
            return invalid(format!(
                "smoothing must be non-negative, got {}",
                self.smoothing
            ));
        }
        if self.min_indicator_count == 0 {
            return invalid("min_indicator_count must be at least 1".to_string());
        }
        if self.numeric_bins == 0 {
            return invalid("numeric_bins must be at least 1".to_string());
        }
        if self.max_levels == 0 {
            return invalid("max_levels must be at least 1".to_string());
        }
        if let ImputeStrategy::Constant(v) = self.imputation {
            if !v.is_finite() {
                return invalid(format!("constant imputation value must be finite, got {v}"));
            }
        }
        if self.codes.is_empty() {
            return invalid("codes must name at least one encoder kind".to_string());
        }
        let ignored: HashSet<&str> = self.ignored_columns.iter().map(String::as_str).collect();
        if let Some(col) = self
            .categorical_columns
            .iter()
            .find(|c| ignored.contains(c.as_str()))
        {
            return invalid(format!(
                "column '{col}' is both ignored and declared categorical"
            ));
        }
        Ok(())
    }
}
