//! Cheap-hit-first decisions
//!
//! An exact normalized match in the dataset is scored straight from the best
//! matching row. Anything else (no match, store unreachable) goes through the
//! full `DecisionEngine` unchanged.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{DecisionEngine, EngineError};
use crate::config::defaults::DATASET_LOOKUP_SOURCE;
use crate::config::EngineConfig;
use crate::dataset::{DatasetRow, HistoricalDataset, RowFilter};
use crate::predictor::ComfortPredictor;
use crate::types::{DecisionResult, DwellingContext, NumericColumn};

const ELEMENT_COLUMN: &str = "element_materials_string";

pub struct DatasetFirstEngine {
    engine: DecisionEngine,
    dataset: Arc<dyn HistoricalDataset>,
}

impl DatasetFirstEngine {
    pub fn new(
        config: Arc<EngineConfig>,
        dataset: Arc<dyn HistoricalDataset>,
        predictor: Arc<dyn ComfortPredictor>,
    ) -> Self {
        Self {
            engine: DecisionEngine::new(config, Arc::clone(&dataset), predictor),
            dataset,
        }
    }

    /// The full pipeline used on a miss.
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn decide(&self, ctx: &DwellingContext) -> Result<DecisionResult, EngineError> {
        ctx.validate()?;

        let Some(row) = self.lookup(ctx) else {
            return self.engine.decide(ctx);
        };

        let vector = self.engine.inference().features_from_rows(ctx, std::slice::from_ref(&row));
        let score = self.engine.score(&vector)?;
        let result = self
            .engine
            .conclude(ctx, &vector, score, DATASET_LOOKUP_SOURCE.to_string(), None);

        info!(
            zone = %ctx.zone,
            apartment = %ctx.apartment_type,
            comfort_score = score,
            compliant = result.compliance.is_compliant,
            "Decision from dataset hit"
        );
        Ok(result)
    }

    pub fn decide_batch(&self, contexts: &[DwellingContext]) -> Vec<Result<DecisionResult, EngineError>> {
        use rayon::prelude::*;
        contexts.par_iter().map(|ctx| self.decide(ctx)).collect()
    }

    /// Best exact match: highest comfort index, first row on ties.
    fn lookup(&self, ctx: &DwellingContext) -> Option<DatasetRow> {
        let apartment = ctx.apartment_type.as_str();
        let filter = match ctx.element_materials.as_deref() {
            Some(element) if !element.trim().is_empty() && self.dataset.has_column(ELEMENT_COLUMN) => {
                RowFilter::exact_with_element(apartment, &ctx.zone, element)
            }
            _ => RowFilter::exact(apartment, &ctx.zone),
        };

        let rows = match self.dataset.query(&filter) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Dataset lookup failed, running full inference");
                return None;
            }
        };
        if rows.is_empty() {
            debug!(zone = %ctx.zone, apartment, "No direct dataset hit");
            return None;
        }

        let comfort = |row: &DatasetRow| {
            row.numeric(NumericColumn::ComfortIndex.name())
                .unwrap_or(f64::NEG_INFINITY)
        };
        let mut best: Option<DatasetRow> = None;
        for row in rows {
            if best.as_ref().map_or(true, |b| comfort(&row) > comfort(b)) {
                best = Some(row);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{InMemoryDataset, UnavailableDataset};
    use crate::predictor::{FeatureFrame, PredictorError};
    use crate::types::{ApartmentType, InferenceTier};

    fn laeq_predictor() -> Arc<dyn ComfortPredictor> {
        Arc::new(|frame: &FeatureFrame| -> Result<f64, PredictorError> {
            Ok(1.0 - frame.numeric("laeq_db")? / 100.0)
        })
    }

    #[test]
    fn test_hit_uses_best_row() {
        let dataset: InMemoryDataset = [
            DatasetRow::new("2Bed", "Roadside-V1")
                .with_value("laeq_db", 70.0)
                .with_value("comfort_index_float", 0.4),
            DatasetRow::new("2Bed", "Roadside-V1")
                .with_value("laeq_db", 50.0)
                .with_value("comfort_index_float", 0.9),
        ]
        .into_iter()
        .collect();
        let engine = DatasetFirstEngine::new(
            Arc::new(EngineConfig::default()),
            Arc::new(dataset),
            laeq_predictor(),
        );
        let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1").with_wall("Gypsum Board");
        let result = engine.decide(&ctx).unwrap();
        assert_eq!(result.source, "Dataset lookup");
        assert_eq!(result.tier, None);
        assert_eq!(result.comfort_score, 0.5);
        assert_eq!(result.wall_upgrade, None);
        assert_eq!(result.improved_score, None);
    }

    #[test]
    fn test_miss_defers_to_full_pipeline() {
        let engine = DatasetFirstEngine::new(
            Arc::new(EngineConfig::default()),
            Arc::new(UnavailableDataset::default()),
            laeq_predictor(),
        );
        let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1");
        let direct = engine.engine().decide(&ctx).unwrap();
        let result = engine.decide(&ctx).unwrap();
        assert_eq!(result.tier, Some(InferenceTier::PhysicsFallback));
        assert_eq!(result, direct);
    }
}
