//! Lifecycle states of a [`Treatment`](super::Treatment).
//!
//! ```text
//! Unfit --> CrossBuilt --> Scored --> Finalized
//!   ^                                     |
//!   +------------- reset / refit ---------+
//! ```

use crate::error::{Result, TreatmentError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentState {
    /// No encoders fit.
    #[default]
    Unfit,
    /// Cross-frame and reference fits available.
    CrossBuilt,
    /// Derived columns scored.
    Scored,
    /// Plan built; `transform` allowed.
    Finalized,
}

impl TreatmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentState::Unfit => "UNFIT",
            TreatmentState::CrossBuilt => "CROSS_BUILT",
            TreatmentState::Scored => "SCORED",
            TreatmentState::Finalized => "FINALIZED",
        }
    }

    /// Whether `self -> to` is a legal step.
    pub fn can_advance_to(&self, to: TreatmentState) -> bool {
        matches!(
            (self, to),
            (TreatmentState::Unfit, TreatmentState::CrossBuilt)
                | (TreatmentState::CrossBuilt, TreatmentState::Scored)
                | (TreatmentState::Scored, TreatmentState::Finalized)
        )
    }

    /// Move to `to`, failing on an illegal step.
    pub(crate) fn advance(&mut self, to: TreatmentState) -> Result<()> {
        if !self.can_advance_to(to) {
            return Err(TreatmentError::State {
                operation: "advance",
                required: to.predecessor().as_str(),
                actual: self.as_str(),
            });
        }
        tracing::debug!(from = self.as_str(), to = to.as_str(), "treatment state");
        *self = to;
        Ok(())
    }

    /// Fail unless the state has reached `required`.
    pub(crate) fn require(&self, operation: &'static str, required: TreatmentState) -> Result<()> {
        if self.rank() < required.rank() {
            return Err(TreatmentError::State {
                operation,
                required: required.as_str(),
                actual: self.as_str(),
            });
        }
        Ok(())
    }

    fn rank(&self) -> u8 {
        match self {
            TreatmentState::Unfit => 0,
            TreatmentState::CrossBuilt => 1,
            TreatmentState::Scored => 2,
            TreatmentState::Finalized => 3,
        }
    }

    fn predecessor(&self) -> TreatmentState {
        match self {
            TreatmentState::Unfit | TreatmentState::CrossBuilt => TreatmentState::Unfit,
            TreatmentState::Scored => TreatmentState::CrossBuilt,
            TreatmentState::Finalized => TreatmentState::Scored,
        }
    }
}

impl std::fmt::Display for TreatmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
