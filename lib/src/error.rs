//! Error types for treatment operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = TreatmentError> = std::result::Result<T, E>;

/// Error type for treatment design and application.
#[derive(Debug, Error)]
pub enum TreatmentError {
    /// Input data violates a precondition (missing outcome values, too few rows, empty frame).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A single column's encoder could not be fit.
    ///
    /// Only surfaced as an error in fail-fast mode; otherwise recorded in the fit report.
    #[error("Fit failed for column '{column}': {reason}")]
    Fit { column: String, reason: String },

    /// Operation called in the wrong lifecycle state.
    #[error("Invalid state: {operation} requires {required}, treatment is {actual}")]
    State {
        operation: &'static str,
        required: &'static str,
        actual: &'static str,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed input frame (ragged columns, duplicate names).
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error during file operations.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV parsing error during frame ingestion.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<bincode::Error> for TreatmentError {
    fn from(err: bincode::Error) -> Self {
        TreatmentError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for TreatmentError {
    fn from(err: serde_json::Error) -> Self {
        TreatmentError::Serialization(err.to_string())
    }
}

/// Error raised by a single encoder fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// No rows were supplied to fit on.
    #[error("cannot fit on an empty row set")]
    EmptyFitSet,

    /// Column and outcome disagree on row count.
    #[error("column has {column_rows} rows but outcome has {outcome_rows}")]
    LengthMismatch {
        column_rows: usize,
        outcome_rows: usize,
    },

    /// Categorical column exceeds the configured level cap.
    #[error("{levels} distinct levels exceeds the limit of {limit}")]
    TooManyLevels { levels: usize, limit: usize },

    /// Encoder is not defined for this outcome kind.
    #[error("encoder {encoder} does not support {outcome} outcomes")]
    UnsupportedOutcome {
        encoder: &'static str,
        outcome: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_precondition() {
        let err = TreatmentError::Precondition("outcome has missing values".to_string());
        assert!(err.to_string().contains("Precondition failed"));
    }

    #[test]
    fn test_error_display_fit() {
        let err = TreatmentError::Fit {
            column: "city".to_string(),
            reason: "too many levels".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("city"));
        assert!(msg.contains("too many levels"));
    }

    #[test]
    fn test_error_display_state() {
        let err = TreatmentError::State {
            operation: "transform",
            required: "FINALIZED",
            actual: "UNFIT",
        };
        assert_eq!(
            err.to_string(),
            "Invalid state: transform requires FINALIZED, treatment is UNFIT"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: TreatmentError = io_err.into();
        assert!(matches!(err, TreatmentError::Io(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: TreatmentError = e.into();
            assert!(matches!(err, TreatmentError::Serialization(_)));
        }
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::TooManyLevels {
            levels: 300,
            limit: 100,
        };
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = TreatmentError::InvalidConfig("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
