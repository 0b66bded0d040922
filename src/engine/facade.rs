//! Full decision pipeline

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use super::{DecisionPhase, EngineError};
use crate::compliance::ComplianceEvaluator;
use crate::config::{EngineConfig, MaterialCategory};
use crate::dataset::HistoricalDataset;
use crate::inference::FeatureInferenceEngine;
use crate::optimization::templates::{build_recommendations, wall_upgrade_text, WALL_UPGRADE};
use crate::optimization::{apply_wall_upgrade, recommend_upgrade};
use crate::predictor::{score_vector, ComfortPredictor};
use crate::types::{BestMaterials, DecisionResult, DwellingContext, FeatureVector, InferenceTier};

/// Stateless per call; every collaborator is shared read-only.
pub struct DecisionEngine {
    config: Arc<EngineConfig>,
    inference: FeatureInferenceEngine,
    evaluator: ComplianceEvaluator,
    predictor: Arc<dyn ComfortPredictor>,
}

impl DecisionEngine {
    pub fn new(
        config: Arc<EngineConfig>,
        dataset: Arc<dyn HistoricalDataset>,
        predictor: Arc<dyn ComfortPredictor>,
    ) -> Self {
        Self {
            inference: FeatureInferenceEngine::new(Arc::clone(&config), dataset),
            evaluator: ComplianceEvaluator::new(Arc::clone(&config)),
            config,
            predictor,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn inference(&self) -> &FeatureInferenceEngine {
        &self.inference
    }

    /// Decide on one dwelling.
    ///
    /// Only an invalid context or a failed primary score is fatal. A failed
    /// re-score of the wall upgrade leaves `improved_score` empty.
    pub fn decide(&self, ctx: &DwellingContext) -> Result<DecisionResult, EngineError> {
        ctx.validate()?;

        let (vector, tier) = self.inference.infer(ctx);
        let score = self.score(&vector)?;

        let mut result = self.conclude(
            ctx,
            &vector,
            score,
            format!("Inference Tier: {}", tier.label()),
            Some(tier),
        );
        self.optimize(&vector, &mut result);

        info!(
            zone = %ctx.zone,
            apartment = %ctx.apartment_type,
            tier = tier.label(),
            comfort_score = result.comfort_score,
            compliant = result.compliance.is_compliant,
            upgrade = result.wall_upgrade.as_ref().map(|c| c.name.as_str()),
            "Decision complete"
        );
        Ok(result)
    }

    /// Decide on independent contexts in parallel. Results keep input order.
    pub fn decide_batch(&self, contexts: &[DwellingContext]) -> Vec<Result<DecisionResult, EngineError>> {
        let results: Vec<_> = contexts.par_iter().map(|ctx| self.decide(ctx)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(total = contexts.len(), failed, "Batch complete");
        results
    }

    /// Primary score; any predictor failure is fatal.
    pub(crate) fn score(&self, vector: &FeatureVector) -> Result<f64, EngineError> {
        score_vector(self.predictor.as_ref(), vector)
            .map_err(|e| EngineError::phase(DecisionPhase::Prediction, e))
    }

    /// Compliance and guidance for an already scored vector.
    pub(crate) fn conclude(
        &self,
        ctx: &DwellingContext,
        vector: &FeatureVector,
        comfort_score: f64,
        source: String,
        tier: Option<InferenceTier>,
    ) -> DecisionResult {
        let compliance = self.evaluator.evaluate(
            vector,
            comfort_score,
            &ctx.activity,
            &ctx.zone,
            &ctx.time_period,
        );
        let recommendations = build_recommendations(
            &compliance,
            vector,
            comfort_score,
            &ctx.activity,
            &self.config.guidance,
        );

        DecisionResult {
            comfort_score,
            source,
            tier,
            compliance,
            recommendations,
            best_materials: BestMaterials {
                wall_material: vector.wall_material.clone(),
            },
            wall_upgrade: None,
            improved_score: None,
        }
    }

    /// Wall-only upgrade search and re-score.
    fn optimize(&self, vector: &FeatureVector, result: &mut DecisionResult) {
        let Some(current) = vector.wall_material.as_deref() else {
            return;
        };
        let Some(upgrade) = recommend_upgrade(MaterialCategory::Wall, current, &self.config.materials) else {
            return;
        };

        let upgraded = apply_wall_upgrade(vector, &upgrade);
        match score_vector(self.predictor.as_ref(), &upgraded) {
            Ok(improved) => {
                result.improved_score = Some(improved);
                result.recommendations.insert(WALL_UPGRADE, wall_upgrade_text(&upgrade));
            }
            Err(e) => warn!(error = %e, upgrade = %upgrade.name, "Re-scoring upgraded wall failed"),
        }
        result.best_materials.wall_material = Some(upgrade.name.clone());
        result.wall_upgrade = Some(upgrade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{InMemoryDataset, UnavailableDataset};
    use crate::predictor::{FeatureFrame, PredictorError};
    use crate::types::ApartmentType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_engine(predictor: impl ComfortPredictor + 'static) -> DecisionEngine {
        DecisionEngine::new(
            Arc::new(EngineConfig::default()),
            Arc::new(UnavailableDataset::default()),
            Arc::new(predictor),
        )
    }

    fn constant(score: f64) -> impl ComfortPredictor {
        move |_: &FeatureFrame| -> Result<f64, PredictorError> { Ok(score) }
    }

    #[test]
    fn test_source_label() {
        let engine = make_engine(constant(0.9));
        let ctx = DwellingContext::new(ApartmentType::OneBed, "Roadside-V1");
        let result = engine.decide(&ctx).unwrap();
        assert_eq!(result.source, "Inference Tier: Tier 4: Global mean fallback");
        assert_eq!(result.tier, Some(InferenceTier::PhysicsFallback));
    }

    #[test]
    fn test_primary_failure_is_fatal() {
        let engine = make_engine(|_: &FeatureFrame| -> Result<f64, PredictorError> {
            Err(PredictorError::Failed("boom".to_string()))
        });
        let ctx = DwellingContext::new(ApartmentType::OneBed, "Roadside-V1");
        let err = engine.decide(&ctx).unwrap_err();
        assert_eq!(err.decision_phase(), Some(DecisionPhase::Prediction));
    }

    #[test]
    fn test_rescore_failure_is_swallowed() {
        let calls = AtomicUsize::new(0);
        let engine = make_engine(move |_: &FeatureFrame| -> Result<f64, PredictorError> {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(0.5)
            } else {
                Err(PredictorError::Failed("second call".to_string()))
            }
        });
        let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1").with_wall("Gypsum Board");
        let result = engine.decide(&ctx).unwrap();
        assert_eq!(result.comfort_score, 0.5);
        assert_eq!(result.improved_score, None);
        assert_eq!(result.best_materials.wall_material.as_deref(), Some("Fiberglass Board"));
        assert!(!result.recommendations.contains(WALL_UPGRADE));
    }

    #[test]
    fn test_invalid_context_rejected_before_scoring() {
        let engine = make_engine(constant(0.9));
        let ctx = DwellingContext::new(ApartmentType::OneBed, "");
        assert!(matches!(engine.decide(&ctx), Err(EngineError::InvalidContext(_))));
    }

    #[test]
    fn test_batch_preserves_order() {
        let engine = DecisionEngine::new(
            Arc::new(EngineConfig::default()),
            Arc::new(InMemoryDataset::new()),
            Arc::new(constant(0.8)),
        );
        let contexts = vec![
            DwellingContext::new(ApartmentType::OneBed, "Roadside-V1"),
            DwellingContext::new(ApartmentType::TwoBed, " "),
            DwellingContext::new(ApartmentType::ThreeBed, "MD-Urban-V2"),
        ];
        let results = engine.decide_batch(&contexts);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
