//! Fixed-schema acoustic feature vector and the predictor column names

use serde::{Deserialize, Serialize};

use super::{ApartmentType, DayNight};
use crate::config::defaults::UNKNOWN_CATEGORY;

/// Numeric predictor columns, in the exact order the comfort model was fitted on.
///
/// The `Legacy*` columns are unnamed spreadsheet columns that the fitted model
/// still expects. They are carried through untouched and default to 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericColumn {
    FloorHeight,
    Laeq,
    TotalSurface,
    Absorption,
    Rt60,
    SourceCount,
    SourceDistance,
    Spl,
    BarrierDistance,
    BarrierHeight,
    SplAfterBarrier,
    SplAfterFacade,
    ComfortIndex,
    AbsorptionNorm,
    Rt60Norm,
    SplNorm,
    ComfortIndexV2,
    SplPerSurface,
    Legacy20,
    Legacy21,
    Legacy22,
    Legacy23,
    Legacy24,
    Legacy25,
    Legacy26,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 25] = [
        NumericColumn::FloorHeight,
        NumericColumn::Laeq,
        NumericColumn::TotalSurface,
        NumericColumn::Absorption,
        NumericColumn::Rt60,
        NumericColumn::SourceCount,
        NumericColumn::SourceDistance,
        NumericColumn::Spl,
        NumericColumn::BarrierDistance,
        NumericColumn::BarrierHeight,
        NumericColumn::SplAfterBarrier,
        NumericColumn::SplAfterFacade,
        NumericColumn::ComfortIndex,
        NumericColumn::AbsorptionNorm,
        NumericColumn::Rt60Norm,
        NumericColumn::SplNorm,
        NumericColumn::ComfortIndexV2,
        NumericColumn::SplPerSurface,
        NumericColumn::Legacy20,
        NumericColumn::Legacy21,
        NumericColumn::Legacy22,
        NumericColumn::Legacy23,
        NumericColumn::Legacy24,
        NumericColumn::Legacy25,
        NumericColumn::Legacy26,
    ];

    /// Column name in the normalized dataset and in the predictor frame.
    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::FloorHeight => "floor_height_m",
            NumericColumn::Laeq => "laeq_db",
            NumericColumn::TotalSurface => "total_surface_sqm",
            NumericColumn::Absorption => "absorption_coefficient_by_area_m",
            NumericColumn::Rt60 => "rt60_s",
            NumericColumn::SourceCount => "n._of_sound_sources_int",
            NumericColumn::SourceDistance => "average_sound_source_distance_m",
            NumericColumn::Spl => "spl_db",
            NumericColumn::BarrierDistance => "barrier_distance_m",
            NumericColumn::BarrierHeight => "barrier_height_m",
            NumericColumn::SplAfterBarrier => "spl_after_barrier_db",
            NumericColumn::SplAfterFacade => "spl_after_facade_dampening_db",
            NumericColumn::ComfortIndex => "comfort_index_float",
            NumericColumn::AbsorptionNorm => "absorption_norm",
            NumericColumn::Rt60Norm => "rt60_norm",
            NumericColumn::SplNorm => "spl_norm",
            NumericColumn::ComfortIndexV2 => "comfortindex_v2",
            NumericColumn::SplPerSurface => "spl_per_surface",
            NumericColumn::Legacy20 => "unnamed_20",
            NumericColumn::Legacy21 => "unnamed_21",
            NumericColumn::Legacy22 => "unnamed_22",
            NumericColumn::Legacy23 => "unnamed_23",
            NumericColumn::Legacy24 => "unnamed_24",
            NumericColumn::Legacy25 => "unnamed_25",
            NumericColumn::Legacy26 => "unnamed_26",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    fn legacy_slot(&self) -> Option<usize> {
        match self {
            NumericColumn::Legacy20 => Some(0),
            NumericColumn::Legacy21 => Some(1),
            NumericColumn::Legacy22 => Some(2),
            NumericColumn::Legacy23 => Some(3),
            NumericColumn::Legacy24 => Some(4),
            NumericColumn::Legacy25 => Some(5),
            NumericColumn::Legacy26 => Some(6),
            _ => None,
        }
    }
}

impl std::fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Categorical predictor columns, in frame order.
pub const CATEGORICAL_COLUMNS: [&str; 4] = [
    "zone_string",
    "apartment_type_string",
    "day/nightstring",
    "element_materials_string",
];

/// Complete feature vector for one dwelling.
///
/// Every predictor column is a concrete field, so a vector can never be
/// missing one. Unknown numerics are 0.0; unknown categoricals are "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub zone: String,
    pub apartment_type: ApartmentType,
    pub day_night: DayNight,
    pub element_materials: String,

    /// Wall finish the vector was derived for (not a predictor column)
    pub wall_material: Option<String>,
    /// Window finish the vector was derived for (not a predictor column)
    pub window_material: Option<String>,

    pub floor_height_m: f64,
    pub laeq_db: f64,
    pub total_surface_sqm: f64,
    /// Average absorption coefficient over the room surfaces
    pub absorption_coefficient: f64,
    pub rt60_s: f64,
    pub sound_source_count: f64,
    pub avg_source_distance_m: f64,
    pub spl_db: f64,
    pub barrier_distance_m: f64,
    pub barrier_height_m: f64,
    pub spl_after_barrier_db: f64,
    pub spl_after_facade_db: f64,
    pub comfort_index: f64,
    pub absorption_norm: f64,
    pub rt60_norm: f64,
    pub spl_norm: f64,
    pub comfort_index_v2: f64,
    pub spl_per_surface: f64,
    pub legacy: [f64; 7],
}

impl FeatureVector {
    /// Vector with categorical fields set and every numeric field at 0.0.
    pub fn empty(
        zone: impl Into<String>,
        apartment_type: ApartmentType,
        day_night: DayNight,
        element_materials: impl Into<String>,
    ) -> Self {
        let element_materials = element_materials.into();
        Self {
            zone: zone.into(),
            apartment_type,
            day_night,
            element_materials: if element_materials.trim().is_empty() {
                UNKNOWN_CATEGORY.to_string()
            } else {
                element_materials
            },
            wall_material: None,
            window_material: None,
            floor_height_m: 0.0,
            laeq_db: 0.0,
            total_surface_sqm: 0.0,
            absorption_coefficient: 0.0,
            rt60_s: 0.0,
            sound_source_count: 0.0,
            avg_source_distance_m: 0.0,
            spl_db: 0.0,
            barrier_distance_m: 0.0,
            barrier_height_m: 0.0,
            spl_after_barrier_db: 0.0,
            spl_after_facade_db: 0.0,
            comfort_index: 0.0,
            absorption_norm: 0.0,
            rt60_norm: 0.0,
            spl_norm: 0.0,
            comfort_index_v2: 0.0,
            spl_per_surface: 0.0,
            legacy: [0.0; 7],
        }
    }

    pub fn get(&self, column: NumericColumn) -> f64 {
        if let Some(slot) = column.legacy_slot() {
            return self.legacy[slot];
        }
        match column {
            NumericColumn::FloorHeight => self.floor_height_m,
            NumericColumn::Laeq => self.laeq_db,
            NumericColumn::TotalSurface => self.total_surface_sqm,
            NumericColumn::Absorption => self.absorption_coefficient,
            NumericColumn::Rt60 => self.rt60_s,
            NumericColumn::SourceCount => self.sound_source_count,
            NumericColumn::SourceDistance => self.avg_source_distance_m,
            NumericColumn::Spl => self.spl_db,
            NumericColumn::BarrierDistance => self.barrier_distance_m,
            NumericColumn::BarrierHeight => self.barrier_height_m,
            NumericColumn::SplAfterBarrier => self.spl_after_barrier_db,
            NumericColumn::SplAfterFacade => self.spl_after_facade_db,
            NumericColumn::ComfortIndex => self.comfort_index,
            NumericColumn::AbsorptionNorm => self.absorption_norm,
            NumericColumn::Rt60Norm => self.rt60_norm,
            NumericColumn::SplNorm => self.spl_norm,
            NumericColumn::ComfortIndexV2 => self.comfort_index_v2,
            NumericColumn::SplPerSurface => self.spl_per_surface,
            _ => 0.0,
        }
    }

    /// Set a numeric column. Non-finite values are stored as 0.0.
    pub fn set(&mut self, column: NumericColumn, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        if let Some(slot) = column.legacy_slot() {
            self.legacy[slot] = value;
            return;
        }
        let field = match column {
            NumericColumn::FloorHeight => &mut self.floor_height_m,
            NumericColumn::Laeq => &mut self.laeq_db,
            NumericColumn::TotalSurface => &mut self.total_surface_sqm,
            NumericColumn::Absorption => &mut self.absorption_coefficient,
            NumericColumn::Rt60 => &mut self.rt60_s,
            NumericColumn::SourceCount => &mut self.sound_source_count,
            NumericColumn::SourceDistance => &mut self.avg_source_distance_m,
            NumericColumn::Spl => &mut self.spl_db,
            NumericColumn::BarrierDistance => &mut self.barrier_distance_m,
            NumericColumn::BarrierHeight => &mut self.barrier_height_m,
            NumericColumn::SplAfterBarrier => &mut self.spl_after_barrier_db,
            NumericColumn::SplAfterFacade => &mut self.spl_after_facade_db,
            NumericColumn::ComfortIndex => &mut self.comfort_index,
            NumericColumn::AbsorptionNorm => &mut self.absorption_norm,
            NumericColumn::Rt60Norm => &mut self.rt60_norm,
            NumericColumn::SplNorm => &mut self.spl_norm,
            NumericColumn::ComfortIndexV2 => &mut self.comfort_index_v2,
            NumericColumn::SplPerSurface => &mut self.spl_per_surface,
            _ => return,
        };
        *field = value;
    }

    /// Numeric values in predictor column order.
    pub fn numeric_values(&self) -> Vec<(NumericColumn, f64)> {
        NumericColumn::ALL.iter().map(|&c| (c, self.get(c))).collect()
    }

    /// Categorical values in predictor column order.
    pub fn categorical_values(&self) -> [(&'static str, String); 4] {
        [
            (CATEGORICAL_COLUMNS[0], self.zone.clone()),
            (CATEGORICAL_COLUMNS[1], self.apartment_type.as_str().to_string()),
            (CATEGORICAL_COLUMNS[2], self.day_night.as_str().to_string()),
            (CATEGORICAL_COLUMNS[3], self.element_materials.clone()),
        ]
    }

    /// True when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        NumericColumn::ALL.iter().all(|&c| self.get(c).is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_are_unique_and_round_trip() {
        let mut names: Vec<&str> = NumericColumn::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NumericColumn::ALL.len());

        for col in NumericColumn::ALL {
            assert_eq!(NumericColumn::from_name(col.name()), Some(col));
        }
    }

    #[test]
    fn test_set_get_covers_every_column() {
        let mut v = FeatureVector::empty("Z", ApartmentType::OneBed, DayNight::Day, "");
        for (i, col) in NumericColumn::ALL.iter().enumerate() {
            v.set(*col, i as f64 + 1.0);
        }
        for (i, col) in NumericColumn::ALL.iter().enumerate() {
            assert_eq!(v.get(*col), i as f64 + 1.0, "column {col}");
        }
    }

    #[test]
    fn test_non_finite_values_are_stored_as_zero() {
        let mut v = FeatureVector::empty("Z", ApartmentType::OneBed, DayNight::Day, "x");
        v.set(NumericColumn::Rt60, f64::NAN);
        v.set(NumericColumn::Spl, f64::INFINITY);
        assert_eq!(v.rt60_s, 0.0);
        assert_eq!(v.spl_db, 0.0);
        assert!(v.is_finite());
    }

    #[test]
    fn test_blank_element_description_becomes_unknown() {
        let v = FeatureVector::empty("Z", ApartmentType::TwoBed, DayNight::Night, "  ");
        assert_eq!(v.element_materials, "Unknown");
        assert_eq!(v.categorical_values()[2].1, "night");
    }
}
