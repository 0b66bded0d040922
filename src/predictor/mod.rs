//! Comfort predictor boundary
//!
//! The engine never knows which model scores a dwelling. It hands a
//! `FeatureFrame` (fixed column names and order) to whatever implements
//! `ComfortPredictor` and gets a scalar back.
//!
//! Plain closures work as predictors:
//!
//! ```
//! use ecoform_engine::predictor::{ComfortPredictor, FeatureFrame, PredictorError};
//!
//! let constant = |_: &FeatureFrame| -> Result<f64, PredictorError> { Ok(0.8) };
//! let _boxed: Box<dyn ComfortPredictor> = Box::new(constant);
//! ```

pub mod linear;

pub use linear::LinearComfortModel;

use serde::Serialize;
use thiserror::Error;

use crate::config::defaults::{round_to, SCORE_DECIMALS};
use crate::types::{FeatureVector, NumericColumn, CATEGORICAL_COLUMNS};

/// Predictor failure. Fatal on the primary score, swallowed on re-scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    #[error("predictor failed: {0}")]
    Failed(String),

    #[error("predictor returned a non-finite score ({0})")]
    NonFinite(f64),

    #[error("feature frame has no column '{0}'")]
    MissingColumn(String),
}

/// One-row model input with the fitted column contract.
///
/// Categorical columns come first, then the numeric columns, each in the
/// order the model was fitted on. Numerics are always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureFrame {
    categorical: Vec<(&'static str, String)>,
    numeric: Vec<(&'static str, f64)>,
}

impl FeatureFrame {
    pub fn from_vector(vector: &FeatureVector) -> Self {
        let categorical = vector.categorical_values().into_iter().collect();
        let numeric = vector
            .numeric_values()
            .into_iter()
            .map(|(col, v)| (col.name(), if v.is_nan() { 0.0 } else { v }))
            .collect();
        Self { categorical, numeric }
    }

    /// Column names in frame order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categorical
            .iter()
            .map(|(name, _)| *name)
            .chain(self.numeric.iter().map(|(name, _)| *name))
    }

    pub fn categorical(&self, column: &str) -> Result<&str, PredictorError> {
        self.categorical
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| PredictorError::MissingColumn(column.to_string()))
    }

    pub fn numeric(&self, column: &str) -> Result<f64, PredictorError> {
        self.numeric
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, v)| *v)
            .ok_or_else(|| PredictorError::MissingColumn(column.to_string()))
    }

    pub fn categorical_values(&self) -> &[(&'static str, String)] {
        &self.categorical
    }

    pub fn numeric_values(&self) -> &[(&'static str, f64)] {
        &self.numeric
    }
}

/// Scores a feature frame. Must be deterministic and side-effect free.
pub trait ComfortPredictor: Send + Sync {
    fn predict(&self, frame: &FeatureFrame) -> Result<f64, PredictorError>;
}

impl<F> ComfortPredictor for F
where
    F: Fn(&FeatureFrame) -> Result<f64, PredictorError> + Send + Sync,
{
    fn predict(&self, frame: &FeatureFrame) -> Result<f64, PredictorError> {
        self(frame)
    }
}

/// Build the frame, predict once, reject non-finite output and round to
/// the reported precision.
pub fn score_vector(
    predictor: &dyn ComfortPredictor,
    vector: &FeatureVector,
) -> Result<f64, PredictorError> {
    let frame = FeatureFrame::from_vector(vector);
    tracing::debug!(
        categorical = CATEGORICAL_COLUMNS.len(),
        numeric = NumericColumn::ALL.len(),
        "Scoring feature frame"
    );
    let raw = predictor.predict(&frame)?;
    if !raw.is_finite() {
        return Err(PredictorError::NonFinite(raw));
    }
    Ok(round_to(raw, SCORE_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApartmentType, DayNight};

    fn make_vector() -> FeatureVector {
        let mut v = FeatureVector::empty("Roadside-V1", ApartmentType::TwoBed, DayNight::Night, "Wall: Concrete");
        v.laeq_db = 58.0;
        v.legacy[6] = 4.0;
        v
    }

    #[test]
    fn test_frame_column_order() {
        let frame = FeatureFrame::from_vector(&make_vector());
        let columns: Vec<&str> = frame.columns().collect();
        assert_eq!(columns.len(), 4 + 25);
        assert_eq!(&columns[..4], &CATEGORICAL_COLUMNS);
        assert_eq!(columns[4], "floor_height_m");
        assert_eq!(columns[5], "laeq_db");
        assert_eq!(columns[9], "n._of_sound_sources_int");
        assert_eq!(columns[21], "spl_per_surface");
        assert_eq!(columns[28], "unnamed_26");
    }

    #[test]
    fn test_frame_lookup() {
        let frame = FeatureFrame::from_vector(&make_vector());
        assert_eq!(frame.categorical("day/nightstring"), Ok("night"));
        assert_eq!(frame.numeric("laeq_db"), Ok(58.0));
        assert_eq!(frame.numeric("unnamed_26"), Ok(4.0));
        assert_eq!(
            frame.numeric("bogus"),
            Err(PredictorError::MissingColumn("bogus".to_string()))
        );
    }

    #[test]
    fn test_score_is_rounded() {
        let predictor = |_: &FeatureFrame| -> Result<f64, PredictorError> { Ok(0.123456) };
        assert_eq!(score_vector(&predictor, &make_vector()), Ok(0.123));
    }

    #[test]
    fn test_non_finite_score_is_an_error() {
        let predictor = |_: &FeatureFrame| -> Result<f64, PredictorError> { Ok(f64::NAN) };
        assert!(matches!(
            score_vector(&predictor, &make_vector()),
            Err(PredictorError::NonFinite(_))
        ));
    }
}
