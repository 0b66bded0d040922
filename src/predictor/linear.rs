//! Linear comfort model driven by `[predictor]` configuration
//!
//! A transparent stand-in for a fitted regressor so the CLI can run without
//! model files. Score = intercept + Σ wᵢ·xᵢ + matching categorical offsets,
//! clamped to [0, 1].

use tracing::warn;

use super::{ComfortPredictor, FeatureFrame, PredictorError};
use crate::config::PredictorConfig;
use crate::types::NumericColumn;

#[derive(Debug, Clone, PartialEq)]
struct CategoricalOffset {
    column: String,
    value: String,
    offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearComfortModel {
    intercept: f64,
    weights: Vec<(NumericColumn, f64)>,
    offsets: Vec<CategoricalOffset>,
}

impl LinearComfortModel {
    /// Build from configuration. Weights on unknown columns and offsets
    /// without a `column=value` key are dropped with a warning.
    pub fn from_config(config: &PredictorConfig) -> Self {
        let mut weights = Vec::with_capacity(config.weights.len());
        for (name, &weight) in &config.weights {
            match NumericColumn::from_name(name) {
                Some(column) => weights.push((column, weight)),
                None => warn!(column = %name, "Ignoring weight for unknown predictor column"),
            }
        }

        let mut offsets = Vec::with_capacity(config.categorical.len());
        for (key, &offset) in &config.categorical {
            match key.split_once('=') {
                Some((column, value)) => offsets.push(CategoricalOffset {
                    column: column.trim().to_string(),
                    value: value.trim().to_string(),
                    offset,
                }),
                None => warn!(key = %key, "Ignoring categorical offset without '='"),
            }
        }

        Self {
            intercept: config.intercept,
            weights,
            offsets,
        }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Default for LinearComfortModel {
    fn default() -> Self {
        Self::from_config(&PredictorConfig::default())
    }
}

impl ComfortPredictor for LinearComfortModel {
    fn predict(&self, frame: &FeatureFrame) -> Result<f64, PredictorError> {
        let mut score = self.intercept;
        for (column, weight) in &self.weights {
            score += weight * frame.numeric(column.name())?;
        }
        for o in &self.offsets {
            if frame.categorical(&o.column)?.eq_ignore_ascii_case(&o.value) {
                score += o.offset;
            }
        }
        Ok(score.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApartmentType, DayNight, FeatureVector};
    use std::collections::BTreeMap;

    fn make_config() -> PredictorConfig {
        PredictorConfig {
            intercept: 0.5,
            weights: BTreeMap::from([("laeq_db".to_string(), -0.01), ("nonsense".to_string(), 9.0)]),
            categorical: BTreeMap::from([
                ("day/nightstring=night".to_string(), -0.1),
                ("malformed".to_string(), 1.0),
            ]),
        }
    }

    #[test]
    fn test_weights_and_offsets() {
        let model = LinearComfortModel::from_config(&make_config());
        let mut v = FeatureVector::empty("Z", ApartmentType::OneBed, DayNight::Night, "x");
        v.laeq_db = 20.0;
        let score = model.predict(&FeatureFrame::from_vector(&v)).unwrap();
        assert!((score - 0.2).abs() < 1e-12);

        v.day_night = DayNight::Day;
        let score = model.predict(&FeatureFrame::from_vector(&v)).unwrap();
        assert!((score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_output_is_clamped() {
        let model = LinearComfortModel::from_config(&make_config());
        let mut v = FeatureVector::empty("Z", ApartmentType::OneBed, DayNight::Day, "x");
        v.laeq_db = 500.0;
        assert_eq!(model.predict(&FeatureFrame::from_vector(&v)).unwrap(), 0.0);
        v.laeq_db = -500.0;
        assert_eq!(model.predict(&FeatureFrame::from_vector(&v)).unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_categorical_column_is_an_error() {
        let config = PredictorConfig {
            intercept: 0.5,
            weights: BTreeMap::new(),
            categorical: BTreeMap::from([("colour=blue".to_string(), 0.1)]),
        };
        let model = LinearComfortModel::from_config(&config);
        let v = FeatureVector::empty("Z", ApartmentType::OneBed, DayNight::Day, "x");
        assert_eq!(
            model.predict(&FeatureFrame::from_vector(&v)),
            Err(PredictorError::MissingColumn("colour".to_string()))
        );
    }
}
