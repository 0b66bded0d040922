//! Decision errors

use thiserror::Error;

use crate::predictor::PredictorError;
use crate::types::ContextError;

/// Stage of `decide()` a failure came from.
///
/// Inference, compliance and recommendation degrade instead of failing
/// (physics fallback, unknown-range verdicts, a missing `improved_score`),
/// so `decide()` only ever reports `Prediction`. The other stages exist so
/// hosts wrapping the engine can tag their own failures consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionPhase {
    Inference,
    Prediction,
    Compliance,
    Recommendation,
}

impl std::fmt::Display for DecisionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionPhase::Inference => write!(f, "inference"),
            DecisionPhase::Prediction => write!(f, "prediction"),
            DecisionPhase::Compliance => write!(f, "compliance"),
            DecisionPhase::Recommendation => write!(f, "recommendation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid context: {0}")]
    InvalidContext(#[from] ContextError),

    #[error("{phase} phase failed: {source}")]
    Phase {
        phase: DecisionPhase,
        #[source]
        source: PredictorError,
    },
}

impl EngineError {
    pub fn phase(phase: DecisionPhase, source: PredictorError) -> Self {
        EngineError::Phase { phase, source }
    }

    /// Phase tag, `None` for rejected input.
    pub fn decision_phase(&self) -> Option<DecisionPhase> {
        match self {
            EngineError::InvalidContext(_) => None,
            EngineError::Phase { phase, .. } => Some(*phase),
        }
    }
}
