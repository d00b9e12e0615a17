//! # crossframe
//!
//! Leakage-free numeric treatment of messy tabular data.
//!
//! Categorical columns, missing values and raw numerics are turned into a
//! fully numeric frame suitable for downstream modeling. Encoders that look
//! at the outcome (impact coding, level deviation, numeric score) are
//! evaluated with cross-fitting: every training row is encoded by an encoder
//! that never saw that row, so no outcome information leaks into the
//! training frame.
//!
//! ## Core Design Principles
//!
//! - **Two-Phase Lifecycle**: a [`Treatment`] is designed once on training data
//!   (`UNFIT → CROSS_BUILT → SCORED → FINALIZED`) and then applied to any number
//!   of new frames through a read-only [`TransformPlan`].
//! - **Cross-Fitting**: a seeded [`FoldPlan`] partitions the rows; y-aware
//!   encoders are fit on each fold's complement and applied to the fold.
//! - **Closed Encoder Set**: encoders are enum variants with serializable
//!   fitted state, so plans round-trip through JSON or bincode.
//! - **Significance Pruning**: each derived column is scored against the
//!   outcome and kept only if it passes a Bonferroni-style threshold.
//!
//! ## Quick Start
//!
//! ```rust
//! use crossframe::{Frame, Treatment, TreatmentConfig};
//!
//! let colors: Vec<&str> = (0..40).map(|i| ["red", "green", "blue", "red"][i % 4]).collect();
//! let sizes: Vec<Option<f64>> = (0..40)
//!     .map(|i| if i % 7 == 0 { None } else { Some(i as f64) })
//!     .collect();
//! let y: Vec<f64> = (0..40)
//!     .map(|i| if i % 4 == 1 { 5.0 } else { 1.0 } + 0.05 * i as f64)
//!     .collect();
//!
//! let frame = Frame::builder()
//!     .categorical_str("color", &colors)
//!     .numeric("size", sizes)
//!     .numeric_f64("y", &y)
//!     .build()?;
//!
//! let mut treatment = Treatment::new(TreatmentConfig::regression().with_folds(4))?;
//! let training = treatment.fit_transform(&frame, "y")?;
//! assert!(!training.frame.has_missing());
//!
//! let scoring = treatment.transform(&frame)?;
//! assert_eq!(scoring.frame.column_names(), training.frame.column_names());
//! # Ok::<(), crossframe::TreatmentError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `frame` — Input frames (numeric/categorical columns, CSV and polars ingestion)
//! - `folds` — Seeded, optionally stratified fold plans
//! - `encoding` — Column encoders and their fitted, serializable forms
//! - `cross` — Cross-frame construction
//! - `scoring` — Per-column significance scoring and pruning
//! - `plan` — Inference-time transform plan and persistence
//! - `treatment` — The lifecycle orchestrator
//! - `config` — Treatment configuration
//! - `stats` — Statistical primitives (correlation, F and χ² tests, logistic fit)

/// Treatment configuration and presets.
pub mod config;

/// Cross-validated frame construction.
pub mod cross;

/// Column encoders.
pub mod encoding;

/// Error types.
pub mod error;

/// Fold plans for cross-fitting.
pub mod folds;

/// Input and output frames.
pub mod frame;

/// Inference-time transform plans.
pub mod plan;

/// Variable scoring and selection.
pub mod scoring;

/// Statistical primitives.
pub mod stats;

/// Treatment lifecycle.
pub mod treatment;

pub use config::{ExecutionMode, FoldStrategy, TreatmentConfig};
pub use cross::{CrossFrame, CrossFrameBuilder, DerivedColumn, FitFailure};
pub use encoding::{EncoderKind, ImputeStrategy};
pub use error::{EncodeError, Result, TreatmentError};
pub use folds::{FoldPlan, Stratification};
pub use frame::{Column, ColumnData, ColumnKind, Frame, NumericFrame, Outcome, OutcomeKind};
pub use plan::{BinaryFormat, SchemaWarning, TransformOutput, TransformPlan};
pub use scoring::{Rejection, ScoreFrame, VarScorer, VariableScore};
pub use treatment::{FitReport, FitResult, SkippedColumn, Treatment, TreatmentState};
