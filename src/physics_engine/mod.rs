//! Physics Engine Module
//!
//! Deterministic room-acoustics estimates used when the historical dataset
//! has nothing to say about a dwelling. All math here is first-principles
//! physics - no dataset, no predictor.
//!
//! - `RoomDimensions::for_apartment()` - reference geometry per size class
//! - `sabine_rt60()` - reverberation time
//! - `reverberant_spl()` - sound pressure level from total absorption
//! - `estimate_room_acoustics()` - all of the above for one context
//! - `physics_fallback_features()` - a complete feature vector from the estimate

pub mod acoustic_models;

pub use acoustic_models::{
    mean_absorption, normalized, reverberant_spl, sabine_rt60, surface_area, total_absorption,
    RoomDimensions,
};

use crate::config::{EngineConfig, MaterialCategory};
use crate::types::{DwellingContext, FeatureVector};

/// Intermediate room-acoustics estimate for one dwelling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomAcoustics {
    pub dimensions: RoomDimensions,
    pub surface_m2: f64,
    pub avg_absorption: f64,
    pub total_absorption: f64,
    pub rt60_s: f64,
    pub spl_db: f64,
}

/// Estimate room acoustics from apartment type and finishes.
///
/// Wall and window finishes resolve against their catalogs by exact name,
/// ignoring case. The average of whatever resolves is used; if nothing
/// does, the configured default absorption applies.
pub fn estimate_room_acoustics(ctx: &DwellingContext, config: &EngineConfig) -> RoomAcoustics {
    let physics = &config.physics;
    let dimensions = RoomDimensions::for_apartment(ctx.apartment_type);
    let surface_m2 = dimensions.surface_area();

    let resolved: Vec<f64> = [
        (MaterialCategory::Wall, ctx.wall_material.as_deref()),
        (MaterialCategory::Window, ctx.window_material.as_deref()),
    ]
    .into_iter()
    .filter_map(|(category, material)| config.materials.exact(category, material?))
    .collect();

    let avg_absorption = mean_absorption(&resolved, physics.default_absorption);
    let total = total_absorption(avg_absorption, surface_m2);
    let rt60_s = sabine_rt60(physics.sabine_constant, dimensions.volume_m3, total);
    let spl_db = reverberant_spl(physics.source_power_db, total);

    tracing::debug!(
        apartment = %ctx.apartment_type,
        resolved = resolved.len(),
        avg_absorption,
        rt60_s,
        spl_db,
        "Room acoustics estimated"
    );

    RoomAcoustics {
        dimensions,
        surface_m2,
        avg_absorption,
        total_absorption: total,
        rt60_s,
        spl_db,
    }
}

/// Complete feature vector synthesized from `estimate_room_acoustics`.
///
/// Measurements the physics cannot supply (ambient LAeq, comfort index,
/// source layout) take their configured defaults; barriers are assumed
/// absent. Floor height is one storey unless the caller overrides it.
pub fn physics_fallback_features(ctx: &DwellingContext, config: &EngineConfig) -> FeatureVector {
    let p = &config.physics;
    let room = estimate_room_acoustics(ctx, config);

    let mut v = FeatureVector::empty(
        ctx.zone.clone(),
        ctx.apartment_type,
        ctx.day_night(),
        ctx.element_description(),
    );
    v.wall_material = ctx.wall_material.clone();
    v.window_material = ctx.window_material.clone();

    v.floor_height_m = p.storey_height_m;
    v.laeq_db = p.default_laeq_db;
    v.total_surface_sqm = room.surface_m2;
    v.absorption_coefficient = room.avg_absorption;
    v.rt60_s = room.rt60_s;
    v.sound_source_count = p.default_source_count;
    v.avg_source_distance_m = p.default_source_distance_m;
    v.spl_db = room.spl_db;
    v.barrier_distance_m = 0.0;
    v.barrier_height_m = 0.0;
    v.spl_after_barrier_db = room.spl_db * p.barrier_factor;
    v.spl_after_facade_db = room.spl_db * p.facade_factor;
    v.comfort_index = p.default_comfort_index;
    v.absorption_norm = normalized(room.avg_absorption, p.absorption_norm_divisor);
    v.rt60_norm = normalized(room.rt60_s, p.rt60_norm_divisor);
    v.spl_norm = normalized(room.spl_db, p.spl_norm_divisor);
    v.comfort_index_v2 = p.default_comfort_index;
    v.spl_per_surface = if room.surface_m2 > 0.0 {
        room.spl_db / room.surface_m2
    } else {
        0.0
    };
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApartmentType;

    fn make_context() -> DwellingContext {
        DwellingContext::new(ApartmentType::ThreeBed, "HD-Urban-V0")
            .with_wall("Fiberglass Board")
            .with_window("Double Glazing")
    }

    #[test]
    fn test_fiberglass_and_double_glazing() {
        let config = EngineConfig::default();
        let room = estimate_room_acoustics(&make_context(), &config);
        assert!((room.surface_m2 - 144.0).abs() < 1e-9);
        assert!((room.avg_absorption - 0.435).abs() < 1e-12);
        assert!((room.total_absorption - 62.64).abs() < 1e-9);
        assert!((room.rt60_s - 0.161 * 108.0 / 62.64).abs() < 1e-12);
        assert!((room.spl_db - (85.0 - 10.0 * 62.64f64.log10())).abs() < 1e-12);
    }

    #[test]
    fn test_unresolved_materials_use_default_absorption() {
        let config = EngineConfig::default();
        let ctx = DwellingContext::new(ApartmentType::TwoBed, "Z").with_wall("Rammed Earth");
        let room = estimate_room_acoustics(&ctx, &config);
        assert_eq!(room.avg_absorption, 0.1);
        assert!((room.total_absorption - 10.8).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_vector_fields() {
        let config = EngineConfig::default();
        let v = physics_fallback_features(&make_context(), &config);
        assert_eq!(v.laeq_db, 45.0);
        assert_eq!(v.floor_height_m, 3.0);
        assert_eq!(v.sound_source_count, 1.0);
        assert_eq!(v.avg_source_distance_m, 2.0);
        assert_eq!(v.comfort_index, 0.7);
        assert_eq!(v.comfort_index_v2, 0.7);
        assert!((v.spl_after_barrier_db - v.spl_db * 0.9).abs() < 1e-12);
        assert!((v.spl_after_facade_db - v.spl_db * 0.85).abs() < 1e-12);
        assert!((v.spl_norm - v.spl_db / 60.0).abs() < 1e-12);
        assert!((v.spl_per_surface - v.spl_db / 144.0).abs() < 1e-12);
        assert_eq!(v.element_materials, "Wall: Fiberglass Board; Window: Double Glazing");
        assert_eq!(v.legacy, [0.0; 7]);
    }
}
