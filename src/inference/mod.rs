//! Feature Inference Engine
//!
//! Turns a partial `DwellingContext` into a schema-complete `FeatureVector`.
//! Tiers are tried in order and the first one with matching rows wins:
//!
//! 1. `ExactMatch` - normalized apartment type and zone equal
//! 2. `PartialMatch` - both contained in the row values
//! 3. `ApartmentOnlyMatch` - zone relaxed
//! 4. `PhysicsFallback` - no rows at all; synthesized from room acoustics
//!
//! Dataset tiers share one aggregation (column means). Whatever tier wins,
//! an explicit floor level then overrides the floor height.

pub mod aggregation;

pub use aggregation::{aggregate_column_means, AggregationReport};

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::defaults::{round_to, FLOOR_HEIGHT_DECIMALS};
use crate::config::EngineConfig;
use crate::dataset::{DatasetError, DatasetRow, HistoricalDataset, RowFilter};
use crate::physics_engine::physics_fallback_features;
use crate::types::{DwellingContext, FeatureVector, InferenceTier};

/// Dataset tiers, most specific first.
const DATASET_TIERS: [InferenceTier; 3] = [
    InferenceTier::ExactMatch,
    InferenceTier::PartialMatch,
    InferenceTier::ApartmentOnlyMatch,
];

/// Row filter for a dataset tier; `None` for the physics fallback.
pub fn tier_filter(tier: InferenceTier, ctx: &DwellingContext) -> Option<RowFilter> {
    let apartment = ctx.apartment_type.as_str();
    match tier {
        InferenceTier::ExactMatch => Some(RowFilter::exact(apartment, &ctx.zone)),
        InferenceTier::PartialMatch => Some(RowFilter::contains(apartment, &ctx.zone)),
        InferenceTier::ApartmentOnlyMatch => Some(RowFilter::apartment_contains(apartment)),
        InferenceTier::PhysicsFallback => None,
    }
}

/// Tiered feature inference over a read-only dataset.
#[derive(Clone)]
pub struct FeatureInferenceEngine {
    config: Arc<EngineConfig>,
    dataset: Arc<dyn HistoricalDataset>,
}

impl FeatureInferenceEngine {
    pub fn new(config: Arc<EngineConfig>, dataset: Arc<dyn HistoricalDataset>) -> Self {
        Self { config, dataset }
    }

    /// Infer a complete feature vector. Never fails: dataset errors and
    /// malformed cells degrade to a lower tier or a default value.
    pub fn infer(&self, ctx: &DwellingContext) -> (FeatureVector, InferenceTier) {
        let (mut vector, tier) = match self.match_dataset(ctx) {
            Some((tier, rows)) => (self.aggregate(ctx, &rows), tier),
            None => (physics_fallback_features(ctx, &self.config), InferenceTier::PhysicsFallback),
        };
        self.apply_floor_level(ctx, &mut vector);

        debug!(
            tier = tier.label(),
            zone = %ctx.zone,
            apartment = %ctx.apartment_type,
            floor_height_m = vector.floor_height_m,
            "Features inferred"
        );
        (vector, tier)
    }

    /// Feature vector from rows the caller already selected, floor override
    /// included. Used for direct dataset hits.
    pub fn features_from_rows(&self, ctx: &DwellingContext, rows: &[DatasetRow]) -> FeatureVector {
        let mut vector = self.aggregate(ctx, rows);
        self.apply_floor_level(ctx, &mut vector);
        vector
    }

    fn apply_floor_level(&self, ctx: &DwellingContext, vector: &mut FeatureVector) {
        if let Some(level) = ctx.floor_level {
            vector.floor_height_m = self.floor_height(level);
        }
    }

    /// Floor height for an explicit storey index.
    pub fn floor_height(&self, level: u32) -> f64 {
        round_to(
            f64::from(level) * self.config.physics.storey_height_m,
            FLOOR_HEIGHT_DECIMALS,
        )
    }

    /// First dataset tier with at least one row. An unreachable store counts
    /// as zero rows for every tier.
    fn match_dataset(&self, ctx: &DwellingContext) -> Option<(InferenceTier, Vec<DatasetRow>)> {
        for tier in DATASET_TIERS {
            let filter = tier_filter(tier, ctx)?;
            match self.dataset.query(&filter) {
                Ok(rows) if !rows.is_empty() => {
                    debug!(tier = tier.label(), rows = rows.len(), "Dataset tier matched");
                    return Some((tier, rows));
                }
                Ok(_) => debug!(tier = tier.label(), "No rows for tier"),
                Err(DatasetError::Unavailable(reason)) => {
                    warn!(%reason, "Dataset unavailable, using physics fallback");
                    return None;
                }
                Err(e) => {
                    warn!(error = %e, tier = tier.label(), "Dataset query failed, using physics fallback");
                    return None;
                }
            }
        }
        None
    }

    fn aggregate(&self, ctx: &DwellingContext, rows: &[DatasetRow]) -> FeatureVector {
        let mut vector = FeatureVector::empty(
            ctx.zone.clone(),
            ctx.apartment_type,
            ctx.day_night(),
            ctx.element_description(),
        );
        vector.wall_material = ctx.wall_material.clone();
        vector.window_material = ctx.window_material.clone();
        vector.floor_height_m = self.config.physics.storey_height_m;

        let report = aggregate_column_means(rows, &mut vector);
        if report.cells_skipped > 0 {
            warn!(
                skipped = report.cells_skipped,
                rows = rows.len(),
                "Malformed numeric cells excluded from aggregation"
            );
        }
        debug!(columns = report.columns_filled, "Column means aggregated");
        vector
    }
}
