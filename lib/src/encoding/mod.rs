//! Column encoders.
//!
//! Each [`EncoderKind`] turns one source column into one or more derived
//! numeric columns:
//!
//! | kind               | source      | y-aware | output                  |
//! |--------------------|-------------|---------|-------------------------|
//! | `CleanNumeric`     | numeric     | no      | `{col}`                 |
//! | `MissingIndicator` | any         | no      | `{col}_missing`         |
//! | `Indicator`        | categorical | no      | `{col}_ind_{level}`     |
//! | `Impact`           | categorical | yes     | `{col}_impact`          |
//! | `Prevalence`       | categorical | no      | `{col}_prevalence`      |
//! | `LevelDeviation`   | categorical | yes     | `{col}_deviation`       |
//! | `NumericScore`     | numeric     | yes     | `{col}_score`           |
//!
//! The family is closed: [`Encoder`] and [`FittedEncoder`] dispatch over the
//! variants, and [`FittedEncoder`] is what a `TransformPlan` persists.

mod clean;
mod deviation;
mod impact;
mod impute;
mod indicator;
pub mod levels;
mod missing;
mod prevalence;
mod score;
mod traits;

pub use clean::{CleanNumeric, FittedCleanNumeric};
pub use deviation::{FittedLevelDeviation, LevelDeviation};
pub use impact::{FittedImpact, Impact};
pub use impute::ImputeStrategy;
pub use indicator::{FittedIndicator, Indicator};
pub use missing::{FittedMissingIndicator, MissingIndicator};
pub use prevalence::{FittedPrevalence, Prevalence};
pub use score::{FittedNumericScore, NumericScore};
pub use traits::{ColumnEncoder, FittedColumnEncoder};

use crate::error::EncodeError;
use crate::frame::{ColumnData, ColumnKind, Outcome, OutcomeKind};
use serde::{Deserialize, Serialize};

/// Encoder variants. Declaration order is the output column order within a
/// source column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EncoderKind {
    CleanNumeric,
    MissingIndicator,
    Indicator,
    Impact,
    Prevalence,
    LevelDeviation,
    NumericScore,
}

impl EncoderKind {
    pub const ALL: [EncoderKind; 7] = [
        EncoderKind::CleanNumeric,
        EncoderKind::MissingIndicator,
        EncoderKind::Indicator,
        EncoderKind::Impact,
        EncoderKind::Prevalence,
        EncoderKind::LevelDeviation,
        EncoderKind::NumericScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncoderKind::CleanNumeric => "clean",
            EncoderKind::MissingIndicator => "missing",
            EncoderKind::Indicator => "indicator",
            EncoderKind::Impact => "impact",
            EncoderKind::Prevalence => "prevalence",
            EncoderKind::LevelDeviation => "deviation",
            EncoderKind::NumericScore => "score",
        }
    }

    /// Whether the encoder's fit reads the outcome.
    pub fn is_y_aware(&self) -> bool {
        matches!(
            self,
            EncoderKind::Impact | EncoderKind::LevelDeviation | EncoderKind::NumericScore
        )
    }

    /// Whether the fitted encoder carries statistics of its fit rows.
    ///
    /// A missing indicator only records whether its output exists; its
    /// values depend on the row alone.
    pub fn has_fit_state(&self) -> bool {
        !matches!(self, EncoderKind::MissingIndicator)
    }

    /// Whether the encoder treats columns of the given kind.
    pub fn applies_to(&self, kind: ColumnKind) -> bool {
        match self {
            EncoderKind::MissingIndicator => true,
            EncoderKind::CleanNumeric | EncoderKind::NumericScore => kind == ColumnKind::Numeric,
            EncoderKind::Indicator
            | EncoderKind::Impact
            | EncoderKind::Prevalence
            | EncoderKind::LevelDeviation => kind == ColumnKind::Categorical,
        }
    }

    /// Whether the encoder is defined for the outcome kind.
    pub fn supports(&self, outcome: &OutcomeKind) -> bool {
        match self {
            EncoderKind::LevelDeviation => !outcome.is_classification(),
            _ => true,
        }
    }
}

impl std::fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows and data an encoder is fit on.
#[derive(Clone, Copy, Debug)]
pub struct FitInput<'a> {
    /// Source column name, used to derive output names.
    pub column: &'a str,
    pub data: &'a ColumnData,
    pub outcome: &'a Outcome,
    /// Fit rows (positions into `data` and `outcome`).
    pub rows: &'a [usize],
}

impl<'a> FitInput<'a> {
    pub fn new(
        column: &'a str,
        data: &'a ColumnData,
        outcome: &'a Outcome,
        rows: &'a [usize],
    ) -> Self {
        Self {
            column,
            data,
            outcome,
            rows,
        }
    }

    /// Reject empty row sets and column/outcome length mismatches.
    pub fn check(&self) -> Result<(), EncodeError> {
        if self.rows.is_empty() {
            return Err(EncodeError::EmptyFitSet);
        }
        if self.data.len() != self.outcome.len() {
            return Err(EncodeError::LengthMismatch {
                column_rows: self.data.len(),
                outcome_rows: self.outcome.len(),
            });
        }
        Ok(())
    }

    /// Outcome values restricted to the fit rows.
    pub fn fit_outcome(&self) -> Vec<f64> {
        let y = self.outcome.values();
        self.rows.iter().map(|&r| y[r]).collect()
    }

    /// Present numeric values over the fit rows.
    pub fn present_numbers(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|&r| self.data.numeric_at(r))
            .collect()
    }
}

/// Hyperparameters shared by the encoder family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncoderSettings {
    pub smoothing: f64,
    pub min_indicator_count: usize,
    pub numeric_bins: usize,
    pub imputation: ImputeStrategy,
    pub max_levels: usize,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            smoothing: 1.0,
            min_indicator_count: 2,
            numeric_bins: 10,
            imputation: ImputeStrategy::Mean,
            max_levels: 1000,
        }
    }
}

/// Unfitted encoder of any kind.
#[derive(Clone, Debug)]
pub enum Encoder {
    CleanNumeric(CleanNumeric),
    MissingIndicator(MissingIndicator),
    Indicator(Indicator),
    Impact(Impact),
    Prevalence(Prevalence),
    LevelDeviation(LevelDeviation),
    NumericScore(NumericScore),
}

impl Encoder {
    /// Construct an encoder of `kind` from the shared settings.
    pub fn new(kind: EncoderKind, settings: &EncoderSettings) -> Self {
        match kind {
            EncoderKind::CleanNumeric => {
                Encoder::CleanNumeric(CleanNumeric::new(settings.imputation))
            }
            EncoderKind::MissingIndicator => Encoder::MissingIndicator(MissingIndicator),
            EncoderKind::Indicator => Encoder::Indicator(Indicator::new(
                settings.min_indicator_count,
                settings.max_levels,
            )),
            EncoderKind::Impact => {
                Encoder::Impact(Impact::new(settings.smoothing, settings.max_levels))
            }
            EncoderKind::Prevalence => Encoder::Prevalence(Prevalence::new(settings.max_levels)),
            EncoderKind::LevelDeviation => Encoder::LevelDeviation(LevelDeviation::new(
                settings.smoothing,
                settings.max_levels,
            )),
            EncoderKind::NumericScore => Encoder::NumericScore(NumericScore::new(
                settings.numeric_bins,
                settings.smoothing,
            )),
        }
    }

    pub fn kind(&self) -> EncoderKind {
        match self {
            Encoder::CleanNumeric(_) => EncoderKind::CleanNumeric,
            Encoder::MissingIndicator(_) => EncoderKind::MissingIndicator,
            Encoder::Indicator(_) => EncoderKind::Indicator,
            Encoder::Impact(_) => EncoderKind::Impact,
            Encoder::Prevalence(_) => EncoderKind::Prevalence,
            Encoder::LevelDeviation(_) => EncoderKind::LevelDeviation,
            Encoder::NumericScore(_) => EncoderKind::NumericScore,
        }
    }

    pub fn is_y_aware(&self) -> bool {
        self.kind().is_y_aware()
    }

    /// Fit on `input.rows`.
    pub fn fit(&self, input: &FitInput<'_>) -> Result<FittedEncoder, EncodeError> {
        input.check()?;
        Ok(match self {
            Encoder::CleanNumeric(e) => FittedEncoder::CleanNumeric(e.fit(input)?),
            Encoder::MissingIndicator(e) => FittedEncoder::MissingIndicator(e.fit(input)?),
            Encoder::Indicator(e) => FittedEncoder::Indicator(e.fit(input)?),
            Encoder::Impact(e) => FittedEncoder::Impact(e.fit(input)?),
            Encoder::Prevalence(e) => FittedEncoder::Prevalence(e.fit(input)?),
            Encoder::LevelDeviation(e) => FittedEncoder::LevelDeviation(e.fit(input)?),
            Encoder::NumericScore(e) => FittedEncoder::NumericScore(e.fit(input)?),
        })
    }
}

/// Fitted encoder of any kind; immutable and serializable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FittedEncoder {
    CleanNumeric(FittedCleanNumeric),
    MissingIndicator(FittedMissingIndicator),
    Indicator(FittedIndicator),
    Impact(FittedImpact),
    Prevalence(FittedPrevalence),
    LevelDeviation(FittedLevelDeviation),
    NumericScore(FittedNumericScore),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            FittedEncoder::CleanNumeric($e) => $body,
            FittedEncoder::MissingIndicator($e) => $body,
            FittedEncoder::Indicator($e) => $body,
            FittedEncoder::Impact($e) => $body,
            FittedEncoder::Prevalence($e) => $body,
            FittedEncoder::LevelDeviation($e) => $body,
            FittedEncoder::NumericScore($e) => $body,
        }
    };
}

impl FittedEncoder {
    pub fn kind(&self) -> EncoderKind {
        match self {
            FittedEncoder::CleanNumeric(_) => EncoderKind::CleanNumeric,
            FittedEncoder::MissingIndicator(_) => EncoderKind::MissingIndicator,
            FittedEncoder::Indicator(_) => EncoderKind::Indicator,
            FittedEncoder::Impact(_) => EncoderKind::Impact,
            FittedEncoder::Prevalence(_) => EncoderKind::Prevalence,
            FittedEncoder::LevelDeviation(_) => EncoderKind::LevelDeviation,
            FittedEncoder::NumericScore(_) => EncoderKind::NumericScore,
        }
    }

    pub fn is_y_aware(&self) -> bool {
        self.kind().is_y_aware()
    }
}

impl FittedColumnEncoder for FittedEncoder {
    fn output_names(&self) -> &[String] {
        dispatch!(self, e => e.output_names())
    }

    fn apply(&self, data: &ColumnData, rows: &[usize]) -> Vec<Vec<f64>> {
        dispatch!(self, e => e.apply(data, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ColumnData, Outcome) {
        let data = ColumnData::categorical(vec![Some("a"), Some("b"), Some("a"), Some("b")]);
        let outcome = Outcome::regression("y", vec![1.0, 0.0, 1.0, 0.0]).unwrap();
        (data, outcome)
    }

    #[test]
    fn test_kind_properties() {
        assert!(EncoderKind::Impact.is_y_aware());
        assert!(!EncoderKind::Indicator.is_y_aware());
        assert!(EncoderKind::MissingIndicator.applies_to(ColumnKind::Numeric));
        assert!(!EncoderKind::NumericScore.applies_to(ColumnKind::Categorical));
        let binary = OutcomeKind::BinaryClassification {
            positive: "1".into(),
        };
        assert!(!EncoderKind::LevelDeviation.supports(&binary));
        assert!(EncoderKind::Impact.supports(&binary));
    }

    #[test]
    fn test_kind_order_follows_declaration() {
        let mut kinds = vec![EncoderKind::NumericScore, EncoderKind::CleanNumeric];
        kinds.sort();
        assert_eq!(kinds, vec![EncoderKind::CleanNumeric, EncoderKind::NumericScore]);
    }

    #[test]
    fn test_fit_rejects_empty_rows() {
        let (data, outcome) = setup();
        let input = FitInput::new("c", &data, &outcome, &[]);
        let encoder = Encoder::new(EncoderKind::Impact, &EncoderSettings::default());
        assert_eq!(encoder.fit(&input).unwrap_err(), EncodeError::EmptyFitSet);
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let (_, outcome) = setup();
        let data = ColumnData::categorical(vec![Some("a"), Some("b")]);
        let rows = [0, 1];
        let input = FitInput::new("c", &data, &outcome, &rows);
        let encoder = Encoder::new(EncoderKind::Prevalence, &EncoderSettings::default());
        assert!(matches!(
            encoder.fit(&input),
            Err(EncodeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_dispatch_output_names() {
        let (data, outcome) = setup();
        let rows = [0, 1, 2, 3];
        let input = FitInput::new("c", &data, &outcome, &rows);
        let fitted = Encoder::new(EncoderKind::Impact, &EncoderSettings::default())
            .fit(&input)
            .unwrap();
        assert_eq!(fitted.kind(), EncoderKind::Impact);
        assert_eq!(fitted.output_names(), &["c_impact".to_string()]);
        assert_eq!(fitted.apply_all(&data)[0].len(), 4);
    }
}
