//! Per-variable association scores and the recommendation policy.
//!
//! Every derived column of the cross-frame is scored against the outcome:
//!
//! - regression: Pearson `r`, `R² = r²`, p-value from `F(1, n - 2)`;
//! - binary classification: one-variable logistic regression, deviance
//!   pseudo-`R²`, p-value from `χ²₁` on the deviance reduction.
//!
//! A column is recommended when it has range and its p-value is below
//! `significance_threshold / n_candidates`.

use crate::config::TreatmentConfig;
use crate::cross::DerivedColumn;
use crate::encoding::EncoderKind;
use crate::error::{Result, TreatmentError};
use crate::frame::{NumericFrame, Outcome};
use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Why a derived column was not recommended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Constant column or non-finite statistic.
    NoRange,
    /// p-value at or above the threshold.
    NotSignificant,
    /// Ties a recommended non-y-aware column from the same source.
    PreferSimpler,
}

/// Significance record for one derived column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableScore {
    pub variable: String,
    pub source: String,
    pub encoder: EncoderKind,
    pub y_aware: bool,
    pub has_range: bool,
    /// Pearson correlation with the outcome (point-biserial for classification).
    pub correlation: f64,
    /// `r²` for regression, deviance pseudo-`R²` for classification.
    pub r_squared: f64,
    /// p-value of the association.
    pub significance: f64,
    pub threshold: f64,
    pub recommended: bool,
    pub rejection: Option<Rejection>,
}

/// Scores for all derived columns, in cross-frame order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreFrame {
    scores: Vec<VariableScore>,
}

impl ScoreFrame {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableScore> {
        self.scores.iter()
    }

    pub fn get(&self, variable: &str) -> Option<&VariableScore> {
        self.scores.iter().find(|s| s.variable == variable)
    }

    /// Names of recommended columns.
    pub fn recommended(&self) -> Vec<&str> {
        self.scores
            .iter()
            .filter(|s| s.recommended)
            .map(|s| s.variable.as_str())
            .collect()
    }

    /// Columns kept under the given filter policy: recommended columns, or
    /// every column with range when `filter_to_recommended` is false.
    pub fn selected(&self, filter_to_recommended: bool) -> Vec<String> {
        self.scores
            .iter()
            .filter(|s| {
                if filter_to_recommended {
                    s.recommended
                } else {
                    s.has_range
                }
            })
            .map(|s| s.variable.clone())
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Scores derived columns and applies the recommendation policy.
#[derive(Clone, Debug)]
pub struct VarScorer {
    significance_threshold: f64,
    prefer_simpler: bool,
    tie_tolerance: f64,
}

impl Default for VarScorer {
    fn default() -> Self {
        Self {
            significance_threshold: 1.0,
            prefer_simpler: true,
            tie_tolerance: 1e-9,
        }
    }
}

struct Association {
    correlation: f64,
    r_squared: f64,
    significance: f64,
}

impl VarScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TreatmentConfig) -> Self {
        Self {
            significance_threshold: config.significance_threshold,
            prefer_simpler: config.prefer_simpler,
            tie_tolerance: config.tie_tolerance,
        }
    }

    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
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

    /// Score every column of `cross` described by `derived`.
    ///
    /// # Errors
    /// [`TreatmentError::Precondition`] when `derived` names a column missing
    /// from `cross` or the row counts disagree.
    pub fn score(
        &self,
        cross: &NumericFrame,
        outcome: &Outcome,
        derived: &[DerivedColumn],
    ) -> Result<ScoreFrame> {
        if cross.n_rows() != outcome.len() {
            return Err(TreatmentError::Precondition(format!(
                "cross frame has {} rows, outcome has {}",
                cross.n_rows(),
                outcome.len()
            )));
        }
        let classification = outcome.kind().is_classification();
        let y = outcome.values();

        let mut scores = Vec::with_capacity(derived.len());
        for meta in derived {
            let x = cross.get(&meta.name).ok_or_else(|| {
                TreatmentError::Precondition(format!(
                    "derived column '{}' not found in cross frame",
                    meta.name
                ))
            })?;
            let association = if stats::has_spread(x) {
                associate(x, y, classification)
            } else {
                None
            };
            let has_range = association.is_some();
            let association = association.unwrap_or(Association {
                correlation: 0.0,
                r_squared: 0.0,
                significance: 1.0,
            });
            scores.push(VariableScore {
                variable: meta.name.clone(),
                source: meta.source.clone(),
                encoder: meta.encoder,
                y_aware: meta.y_aware,
                has_range,
                correlation: association.correlation,
                r_squared: association.r_squared,
                significance: association.significance,
                threshold: 0.0,
                recommended: false,
                rejection: None,
            });
        }

        let candidates = scores.iter().filter(|s| s.has_range).count().max(1);
        let threshold = self.significance_threshold / candidates as f64;
        for score in &mut scores {
            score.threshold = threshold;
            if !score.has_range {
                score.rejection = Some(Rejection::NoRange);
            } else if score.significance < threshold {
                score.recommended = true;
            } else {
                score.rejection = Some(Rejection::NotSignificant);
            }
        }

        if self.prefer_simpler {
            self.reject_ties(&mut scores);
        }

        tracing::info!(
            scored = scores.len(),
            recommended = scores.iter().filter(|s| s.recommended).count(),
            threshold,
            "scored derived columns"
        );
        Ok(ScoreFrame { scores })
    }

    fn reject_ties(&self, scores: &mut [VariableScore]) {
        let mut simple_best: HashMap<&str, Vec<f64>> = HashMap::new();
        for s in scores.iter().filter(|s| s.recommended && !s.y_aware) {
            simple_best
                .entry(s.source.as_str())
                .or_default()
                .push(s.r_squared);
        }
        let tied: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.recommended && s.y_aware)
            .filter(|(_, s)| {
                simple_best.get(s.source.as_str()).is_some_and(|stats| {
                    stats
                        .iter()
                        .any(|&simple| (simple - s.r_squared).abs() <= self.tie_tolerance)
                })
            })
            .map(|(i, _)| i)
            .collect();
        for i in tied {
            tracing::debug!(
                variable = %scores[i].variable,
                "rejecting y-aware column tied with simpler sibling"
            );
            scores[i].recommended = false;
            scores[i].rejection = Some(Rejection::PreferSimpler);
        }
    }
}

fn associate(x: &[f64], y: &[f64], classification: bool) -> Option<Association> {
    let correlation = stats::pearson(x, y).unwrap_or(0.0);
    let (r_squared, significance) = if classification {
        let fit = stats::logistic_fit(x, y)?;
        (fit.pseudo_r_squared(), fit.p_value())
    } else {
        let r = stats::pearson(x, y)?;
        stats::regression_significance(r, x.len())
    };
    (r_squared.is_finite() && significance.is_finite()).then_some(Association {
        correlation,
        r_squared,
        significance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, source: &str, encoder: EncoderKind) -> DerivedColumn {
        DerivedColumn {
            name: name.to_string(),
            source: source.to_string(),
            encoder,
            y_aware: encoder.is_y_aware(),
        }
    }

    fn regression_outcome(n: usize) -> Outcome {
        Outcome::regression("y", (0..n).map(|i| i as f64).collect()).unwrap()
    }

    #[test]
    fn test_signal_recommended_constant_rejected() {
        let n = 50;
        let outcome = regression_outcome(n);
        let signal: Vec<f64> = (0..n).map(|i| i as f64 * 2.0 + (i % 3) as f64).collect();
        let frame = NumericFrame::from_columns(
            n,
            vec![("x".to_string(), signal), ("k".to_string(), vec![1.0; n])],
        )
        .unwrap();
        let derived = vec![
            meta("x", "x", EncoderKind::CleanNumeric),
            meta("k", "k", EncoderKind::CleanNumeric),
        ];
        let scores = VarScorer::new().score(&frame, &outcome, &derived).unwrap();

        let x = scores.get("x").unwrap();
        assert!(x.recommended);
        assert!(x.r_squared > 0.9);
        // one candidate with range
        assert_eq!(x.threshold, 1.0);

        let k = scores.get("k").unwrap();
        assert!(!k.has_range);
        assert_eq!(k.rejection, Some(Rejection::NoRange));
        assert_eq!(scores.recommended(), vec!["x"]);
    }

    #[test]
    fn test_noise_not_significant() {
        let n = 40;
        let outcome = regression_outcome(n);
        // alternating pattern uncorrelated with a linear ramp
        let noise: Vec<f64> = (0..n).map(|i| if (i / 2) % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let frame = NumericFrame::from_columns(n, vec![("z".to_string(), noise)]).unwrap();
        let scores = VarScorer::new()
            .with_significance_threshold(0.05)
            .score(&frame, &outcome, &[meta("z", "z", EncoderKind::CleanNumeric)])
            .unwrap();
        let z = scores.get("z").unwrap();
        assert!(z.has_range);
        assert!(!z.recommended);
        assert_eq!(z.rejection, Some(Rejection::NotSignificant));
        assert!(scores.selected(true).is_empty());
        assert_eq!(scores.selected(false), vec!["z".to_string()]);
    }

    #[test]
    fn test_prefer_simpler_rejects_tied_y_aware() {
        let n = 30;
        let outcome = regression_outcome(n);
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let frame = NumericFrame::from_columns(
            n,
            vec![
                ("c_prevalence".to_string(), values.clone()),
                ("c_impact".to_string(), values),
            ],
        )
        .unwrap();
        let derived = vec![
            meta("c_prevalence", "c", EncoderKind::Prevalence),
            meta("c_impact", "c", EncoderKind::Impact),
        ];

        let scores = VarScorer::new().score(&frame, &outcome, &derived).unwrap();
        assert!(scores.get("c_prevalence").unwrap().recommended);
        let impact = scores.get("c_impact").unwrap();
        assert!(!impact.recommended);
        assert_eq!(impact.rejection, Some(Rejection::PreferSimpler));

        let scores = VarScorer::new()
            .with_prefer_simpler(false)
            .score(&frame, &outcome, &derived)
            .unwrap();
        assert!(scores.get("c_impact").unwrap().recommended);
    }

    #[test]
    fn test_classification_scoring() {
        let labels: Vec<bool> = (0..60).map(|i| i % 4 != 0 && i >= 20 || i % 7 == 0).collect();
        let outcome = Outcome::binary("y", &labels, "1");
        let x: Vec<f64> = labels
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                let base = if b { 1.0 } else { -1.0 };
                base + if i % 5 == 0 { -1.5 * base } else { 0.0 }
            })
            .collect();
        let frame = NumericFrame::from_columns(60, vec![("c_impact".to_string(), x)]).unwrap();
        let scores = VarScorer::new()
            .score(&frame, &outcome, &[meta("c_impact", "c", EncoderKind::Impact)])
            .unwrap();
        let s = scores.get("c_impact").unwrap();
        assert!(s.has_range);
        assert!(s.r_squared > 0.0 && s.r_squared < 1.0);
        assert!(s.correlation > 0.0);
        assert!(s.recommended);
    }

    #[test]
    fn test_single_class_outcome_has_no_range() {
        let outcome = Outcome::binary("y", &[true; 30], "1");
        let x: Vec<f64> = (0..30).map(|i| (i % 6) as f64).collect();
        let frame = NumericFrame::from_columns(30, vec![("c_impact".to_string(), x)]).unwrap();
        let scores = VarScorer::new()
            .score(&frame, &outcome, &[meta("c_impact", "c", EncoderKind::Impact)])
            .unwrap();
        let s = scores.get("c_impact").unwrap();
        assert!(!s.has_range);
        assert!(!s.recommended);
        assert_eq!(s.rejection, Some(Rejection::NoRange));
        assert_eq!(s.significance, 1.0);
    }

    #[test]
    fn test_missing_derived_column() {
        let outcome = regression_outcome(3);
        let frame = NumericFrame::with_rows(3);
        let result =
            VarScorer::new().score(&frame, &outcome, &[meta("nope", "n", EncoderKind::Impact)]);
        assert!(matches!(result, Err(TreatmentError::Precondition(_))));
    }
}
