//! Decision Scenario Tests
//!
//! End-to-end `decide()` runs against in-memory datasets and small
//! deterministic predictors.

use std::sync::Arc;

use ecoform_engine::compliance::{METRIC_ABSORPTION, METRIC_RT60, METRIC_SURFACE};
use ecoform_engine::config::MaterialCategory;
use ecoform_engine::dataset::DatasetRow;
use ecoform_engine::optimization::recommend_upgrade;
use ecoform_engine::optimization::templates::{COMFORT_SCORE, ISO, LAEQ_ZONE, RT60, WALL_UPGRADE};
use ecoform_engine::physics_engine::RoomDimensions;
use ecoform_engine::{
    ApartmentType, ComfortPredictor, DatasetFirstEngine, DecisionEngine, DwellingContext,
    EngineConfig, FeatureFrame, InMemoryDataset, InferenceTier, LinearComfortModel,
    PredictorError, RuleKind, UnavailableDataset,
};

// ============================================================================
// Helpers
// ============================================================================

fn constant(score: f64) -> Arc<dyn ComfortPredictor> {
    Arc::new(move |_: &FeatureFrame| -> Result<f64, PredictorError> { Ok(score) })
}

/// Scores 0.9 for fiberglass walls, 0.5 otherwise.
fn fiberglass_lover() -> Arc<dyn ComfortPredictor> {
    Arc::new(|frame: &FeatureFrame| -> Result<f64, PredictorError> {
        let element = frame.categorical("element_materials_string")?;
        Ok(if element.contains("Fiberglass") { 0.9 } else { 0.5 })
    })
}

fn engine_with(dataset: InMemoryDataset, predictor: Arc<dyn ComfortPredictor>) -> DecisionEngine {
    DecisionEngine::new(Arc::new(EngineConfig::default()), Arc::new(dataset), predictor)
}

fn scenario_a_context() -> DwellingContext {
    DwellingContext::new(ApartmentType::ThreeBed, "HD-Urban-V0")
        .with_wall("Fiberglass Board")
        .with_window("Double Glazing")
        .with_floor_level(3)
        .with_activity("Living")
}

fn roadside_rows() -> InMemoryDataset {
    [
        DatasetRow::new("2Bed", "Roadside-V1")
            .with_value("laeq_db", 62.0)
            .with_value("rt60_s", 0.5)
            .with_value("spl_db", 70.0)
            .with_value("total_surface_sqm", 100.0)
            .with_value("comfort_index_float", 0.6),
        DatasetRow::new("2Bed", "Roadside-V1")
            .with_value("laeq_db", 66.0)
            .with_value("rt60_s", 0.7)
            .with_value("spl_db", 72.0)
            .with_value("total_surface_sqm", 120.0)
            .with_value("comfort_index_float", 0.8),
        DatasetRow::new("3Bed", "GreenEdge-V3").with_value("laeq_db", 38.0),
    ]
    .into_iter()
    .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_physics_fallback() {
    let engine = engine_with(InMemoryDataset::new(), constant(0.72));
    let ctx = scenario_a_context();

    let (vector, tier) = engine.inference().infer(&ctx);
    assert_eq!(tier, InferenceTier::PhysicsFallback);
    assert_eq!(vector.floor_height_m, 9.0);

    let room = RoomDimensions::for_apartment(ApartmentType::ThreeBed);
    assert_eq!(room.volume_m3, 108.0);
    assert_eq!(room.floor_area_m2, 36.0);

    // Fiberglass Board 0.80 and Double Glazing 0.07 averaged over 144 m²
    let expected_rt60 = 0.161 * 108.0 / (0.435 * 144.0);
    assert!((vector.rt60_s - expected_rt60).abs() < 1e-9);

    let result = engine.decide(&ctx).expect("decision");
    assert_eq!(result.tier, Some(InferenceTier::PhysicsFallback));
    assert_eq!(result.source, "Inference Tier: Tier 4: Global mean fallback");
    assert_eq!(result.comfort_score, 0.72);
    assert!((result.compliance.metrics[METRIC_RT60] - expected_rt60).abs() < 1e-9);
    assert!((result.compliance.metrics[METRIC_SURFACE] - 144.0).abs() < 1e-9);
    assert!((result.compliance.metrics[METRIC_ABSORPTION] - 0.435).abs() < 1e-12);

    // 45 dB is below the 55-65 dB day band; 0.28 s is under the 0.4 s target
    assert!(!result.compliance.is_compliant);
    assert!(result.recommendations.contains(LAEQ_ZONE));
    assert!(result.recommendations.contains(RT60));
    assert_eq!(
        result.recommendations.get(ISO),
        Some("ISO/WHO compliance failed: LAeq > 35 dB")
    );

    // Fiberglass is already the most absorptive wall
    assert_eq!(result.wall_upgrade, None);
    assert_eq!(result.improved_score, None);
    assert_eq!(result.best_materials.wall_material.as_deref(), Some("Fiberglass Board"));
}

#[test]
fn scenario_b_exact_dataset_match() {
    let engine = engine_with(roadside_rows(), constant(0.8));
    let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1");

    let (vector, tier) = engine.inference().infer(&ctx);
    assert_eq!(tier, InferenceTier::ExactMatch);
    assert_eq!(vector.laeq_db, 64.0);
    assert!((vector.rt60_s - 0.6).abs() < 1e-12);
    assert_eq!(vector.spl_db, 71.0);
    assert_eq!(vector.total_surface_sqm, 110.0);
    assert!((vector.comfort_index - 0.7).abs() < 1e-12);
    // Not physics-derived: a 2Bed reference room has 108 m² of surface
    assert_ne!(vector.total_surface_sqm, 108.0);

    let result = engine.decide(&ctx).expect("decision");
    assert_eq!(result.source, "Inference Tier: Tier 1: Exact apartment + zone match");
    assert!(result.compliance.passed(RuleKind::ZoneNoise));
    assert!(result.compliance.passed(RuleKind::Rt60));
}

#[test]
fn scenario_c_low_comfort_for_sleeping() {
    let engine = engine_with(InMemoryDataset::new(), constant(0.60));
    let ctx = DwellingContext::new(ApartmentType::OneBed, "GreenEdge-V3")
        .with_activity("Sleeping")
        .with_time_period("night");

    let result = engine.decide(&ctx).expect("decision");
    assert!(!result.compliance.is_compliant);
    assert!(!result.compliance.passed(RuleKind::ComfortScore));

    let text = result.recommendations.get(COMFORT_SCORE).expect("comfort entry");
    assert!(text.contains("0.60"), "{text}");
    assert!(text.contains("0.85"), "{text}");
    assert!(text.contains("Sleeping"), "{text}");
    assert!(result
        .compliance
        .iso_failures
        .contains(&"Comfort score < 0.85".to_string()));
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn repeated_decisions_are_identical() {
    let engine = engine_with(
        roadside_rows(),
        Arc::new(LinearComfortModel::from_config(&EngineConfig::default().predictor)),
    );
    let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1")
        .with_wall("Gypsum Board")
        .with_window("Single Glazing")
        .with_floor_level(4);

    let first = engine.decide(&ctx).expect("first");
    let second = engine.decide(&ctx).expect("second");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}

#[test]
fn every_verdict_reports_four_rules() {
    let engine = engine_with(roadside_rows(), constant(0.75));
    let contexts = [
        DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1"),
        DwellingContext::new(ApartmentType::ThreeBed, "Nowhere-V9").with_activity("Juggling"),
        DwellingContext::new(ApartmentType::OneBed, "LD-Urban-V3").with_time_period("late"),
    ];
    for ctx in &contexts {
        let result = engine.decide(ctx).expect("decision");
        let kinds: Vec<RuleKind> = result.compliance.rules.iter().map(|o| o.rule).collect();
        assert_eq!(
            kinds,
            [RuleKind::ZoneNoise, RuleKind::Rt60, RuleKind::IsoWho, RuleKind::ComfortScore]
        );
        assert_eq!(result.compliance.reason.matches(" | ").count(), 3);
    }
}

#[test]
fn upgrade_is_rescored_and_reported() {
    let engine = engine_with(InMemoryDataset::new(), fiberglass_lover());
    let ctx = DwellingContext::new(ApartmentType::TwoBed, "MD-Urban-V2").with_wall("Gypsum Board");

    let result = engine.decide(&ctx).expect("decision");
    assert_eq!(result.comfort_score, 0.5);
    assert_eq!(result.improved_score, Some(0.9));
    let upgrade = result.wall_upgrade.as_ref().expect("upgrade");
    assert_eq!(upgrade.name, "Fiberglass Board");
    assert_eq!(
        result.recommendations.get(WALL_UPGRADE),
        Some("Try upgrading to: Fiberglass Board (abs=0.8)")
    );
    assert_eq!(result.best_materials.wall_material.as_deref(), Some("Fiberglass Board"));
}

#[test]
fn upgrades_strictly_improve_absorption() {
    let config = EngineConfig::default();
    let catalog = &config.materials;
    for current in &catalog.wall {
        let resolved = catalog
            .containing(MaterialCategory::Wall, &current.name)
            .expect("catalog names resolve to themselves or a contained name");
        match recommend_upgrade(MaterialCategory::Wall, &current.name, catalog) {
            Some(upgrade) => {
                assert!(upgrade.absorption > resolved.absorption, "{} -> {}", current.name, upgrade.name);
                assert!(catalog.wall.iter().all(|m| m.absorption <= upgrade.absorption));
            }
            None => assert!(catalog.wall.iter().all(|m| m.absorption <= resolved.absorption)),
        }
    }
}

#[test]
fn unknown_wall_gets_no_upgrade() {
    let engine = engine_with(InMemoryDataset::new(), constant(0.5));
    let ctx = DwellingContext::new(ApartmentType::TwoBed, "MD-Urban-V2").with_wall("Rammed Earth");
    let result = engine.decide(&ctx).expect("decision");
    assert_eq!(result.wall_upgrade, None);
    assert_eq!(result.best_materials.wall_material.as_deref(), Some("Rammed Earth"));
    assert!(!result.recommendations.contains(WALL_UPGRADE));
}

#[test]
fn fully_compliant_dwelling_has_no_guidance() {
    let dataset: InMemoryDataset = [DatasetRow::new("1Bed", "MD-Urban-V2")
        .with_value("laeq_db", 34.0)
        .with_value("rt60_s", 0.5)]
    .into_iter()
    .collect();
    let mut config = EngineConfig::default();
    config
        .zones
        .insert("MD-Urban-V2".to_string(), ecoform_engine::config::ZoneNoiseRange::new((30.0, 60.0), (30.0, 50.0)));
    let engine = DecisionEngine::new(Arc::new(config), Arc::new(dataset), constant(0.9));

    let result = engine.decide(&DwellingContext::new(ApartmentType::OneBed, "MD-Urban-V2")).expect("decision");
    assert!(result.compliance.is_compliant, "{}", result.compliance.reason);
    assert_eq!(result.compliance.status(), "Compliant");
    assert!(result.recommendations.is_empty());
}

// ============================================================================
// Dataset-first
// ============================================================================

#[test]
fn dataset_first_falls_back_when_store_unreachable() {
    let config = Arc::new(EngineConfig::default());
    let first = DatasetFirstEngine::new(
        Arc::clone(&config),
        Arc::new(UnavailableDataset::default()),
        fiberglass_lover(),
    );
    let full = DecisionEngine::new(config, Arc::new(UnavailableDataset::default()), fiberglass_lover());

    let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside-V2").with_wall("Gypsum Board");
    assert_eq!(first.decide(&ctx).expect("first"), full.decide(&ctx).expect("full"));
}

#[test]
fn dataset_first_falls_back_on_miss() {
    let engine = DatasetFirstEngine::new(
        Arc::new(EngineConfig::default()),
        Arc::new(roadside_rows()),
        constant(0.7),
    );
    // Only a partial match exists for this zone
    let ctx = DwellingContext::new(ApartmentType::TwoBed, "Roadside");
    let result = engine.decide(&ctx).expect("decision");
    assert_eq!(result.tier, Some(InferenceTier::PartialMatch));
}

#[test]
fn dataset_first_hit_applies_floor_override() {
    let engine = DatasetFirstEngine::new(
        Arc::new(EngineConfig::default()),
        Arc::new(roadside_rows()),
        Arc::new(|frame: &FeatureFrame| -> Result<f64, PredictorError> {
            frame.numeric("floor_height_m").map(|h| h / 100.0)
        }),
    );
    let ctx = DwellingContext::new(ApartmentType::TwoBed, "roadside v1").with_floor_level(7);
    let result = engine.decide(&ctx).expect("decision");
    assert_eq!(result.source, "Dataset lookup");
    assert_eq!(result.comfort_score, 0.21);
    // Highest comfort index row wins: 66 dB
    assert_eq!(result.compliance.metrics["LAeq (dB)"], 66.0);
}

// ============================================================================
// Batch
// ============================================================================

#[test]
fn batch_matches_sequential_decisions() {
    let engine = engine_with(roadside_rows(), fiberglass_lover());
    let contexts: Vec<DwellingContext> = (0..16)
        .map(|i| {
            DwellingContext::new(ApartmentType::TwoBed, "Roadside-V1")
                .with_wall(if i % 2 == 0 { "Gypsum Board" } else { "Wood Paneling" })
                .with_floor_level(i)
        })
        .collect();

    let batch = engine.decide_batch(&contexts);
    assert_eq!(batch.len(), contexts.len());
    for (ctx, result) in contexts.iter().zip(batch) {
        assert_eq!(result.expect("batch decision"), engine.decide(ctx).expect("sequential"));
    }
}
