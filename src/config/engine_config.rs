//! Engine Configuration - reference tables and tuning constants as TOML values
//!
//! Every table the decision engine consults (zone noise ranges, RT60 window,
//! activity limits, material catalogs, guidance text, physics constants) is a
//! field in this module. Each struct implements `Default` with the built-in
//! reference values, so an empty or missing config file behaves identically
//! to the stock tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults::{CONFIG_ENV_VAR, LOCAL_CONFIG_FILE};
use crate::normalize::normalize_key;
use crate::types::{DayNight, MaterialCandidate};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the decision engine.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$ECOFORM_CONFIG` env var
/// 2. `./ecoform.toml`
/// 3. Built-in defaults
///
/// A `[zones]` or `[activities]` table in the file replaces the built-in
/// table wholesale; other sections merge field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Global RT60 window and comfort fallback
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Zone name → day/night LAeq range
    #[serde(default = "default_zones")]
    pub zones: BTreeMap<String, ZoneNoiseRange>,

    /// Activity name → comfort threshold and ISO/WHO ceilings
    #[serde(default = "default_activities")]
    pub activities: BTreeMap<String, ActivityLimits>,

    /// Absorption catalogs per element category
    #[serde(default)]
    pub materials: MaterialCatalog,

    /// Static remediation text
    #[serde(default)]
    pub guidance: GuidanceConfig,

    /// Room-acoustics constants for the physics fallback
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// Historical dataset location
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Coefficients for the bundled linear comfort model
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceConfig::default(),
            zones: default_zones(),
            activities: default_activities(),
            materials: MaterialCatalog::default(),
            guidance: GuidanceConfig::default(),
            physics: PhysicsConfig::default(),
            dataset: DatasetConfig::default(),
            predictor: PredictorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$ECOFORM_CONFIG` environment variable
    /// 2. `./ecoform.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), zones = config.zones.len(), "Loaded engine config from ECOFORM_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from ECOFORM_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "ECOFORM_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(zones = config.zones.len(), "Loaded engine config from ./ecoform.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./ecoform.toml, using defaults");
                }
            }
        }

        info!("No ecoform.toml found, using built-in reference tables");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; range violations fail the load.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Engine config saved");
        Ok(())
    }

    /// Validate the reference tables for internal consistency.
    ///
    /// Rules:
    /// - RT60 window finite with `0 < target <= max`
    /// - Comfort thresholds and absorption coefficients in `[0, 1]`
    /// - Zone ranges ordered `min <= max`
    /// - Physics divisors strictly positive
    /// - No NaN/Inf anywhere
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.reference;
        let mut errors: Vec<String> = Vec::new();

        if !r.rt60_target_s.is_finite() || !r.rt60_max_s.is_finite() {
            errors.push(format!(
                "reference: RT60 window must be finite (got target={}, max={})",
                r.rt60_target_s, r.rt60_max_s
            ));
        } else {
            if r.rt60_target_s <= 0.0 {
                errors.push(format!(
                    "reference.rt60_target_s ({:.2}) must be > 0",
                    r.rt60_target_s
                ));
            }
            if r.rt60_max_s < r.rt60_target_s {
                errors.push(format!(
                    "reference.rt60_max_s ({:.2}) must be >= rt60_target_s ({:.2})",
                    r.rt60_max_s, r.rt60_target_s
                ));
            }
        }

        Self::check_unit_interval(
            r.default_comfort_threshold,
            "reference.default_comfort_threshold",
            &mut errors,
        );

        for (name, zone) in &self.zones {
            Self::check_ordered(zone.day_db, &format!("zones.{name}.day_db"), &mut errors);
            Self::check_ordered(zone.night_db, &format!("zones.{name}.night_db"), &mut errors);
        }

        for (name, limits) in &self.activities {
            Self::check_unit_interval(
                limits.comfort_min,
                &format!("activities.{name}.comfort_min"),
                &mut errors,
            );
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        errors.extend(super::validation::non_finite_values(self));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_unit_interval(value: f64, name: &str, errors: &mut Vec<String>) {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!("{name} ({value}) must be within [0, 1]"));
        }
    }

    fn check_ordered(range: [f64; 2], name: &str, errors: &mut Vec<String>) {
        if range[0] > range[1] {
            errors.push(format!(
                "{name}: min ({:.1}) must be <= max ({:.1})",
                range[0], range[1]
            ));
        }
    }

    /// LAeq range for a zone and period. Zone names match on their normalized
    /// form, so "HD Urban V0" finds "HD-Urban-V0".
    pub fn zone_range(&self, zone: &str, period: DayNight) -> Option<(f64, f64)> {
        let wanted = normalize_key(zone);
        self.zones
            .iter()
            .find(|(name, _)| normalize_key(name) == wanted)
            .map(|(_, range)| range.for_period(period))
    }

    /// Limits for an activity, matched on the normalized name.
    pub fn activity(&self, activity: &str) -> Option<&ActivityLimits> {
        let wanted = normalize_key(activity);
        self.activities
            .iter()
            .find(|(name, _)| normalize_key(name) == wanted)
            .map(|(_, limits)| limits)
    }

    /// Minimum comfort score for an activity, falling back to the global default.
    pub fn comfort_threshold(&self, activity: &str) -> f64 {
        self.activity(activity)
            .map(|a| a.comfort_min)
            .unwrap_or(self.reference.default_comfort_threshold)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Reference Window
// ============================================================================

/// Global acoustic targets that do not vary by zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Lower bound of the acceptable reverberation window (s)
    #[serde(default = "default_rt60_target")]
    pub rt60_target_s: f64,

    /// Upper bound of the acceptable reverberation window (s)
    #[serde(default = "default_rt60_max")]
    pub rt60_max_s: f64,

    /// Comfort threshold for activities missing from `[activities]`
    #[serde(default = "default_comfort_threshold")]
    pub default_comfort_threshold: f64,
}

fn default_rt60_target() -> f64 {
    0.4
}
fn default_rt60_max() -> f64 {
    0.8
}
fn default_comfort_threshold() -> f64 {
    0.70
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            rt60_target_s: default_rt60_target(),
            rt60_max_s: default_rt60_max(),
            default_comfort_threshold: default_comfort_threshold(),
        }
    }
}

// ============================================================================
// Zone Noise Ranges
// ============================================================================

/// Permitted ambient LAeq band for a planning zone, `[min, max]` in dB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneNoiseRange {
    pub day_db: [f64; 2],
    pub night_db: [f64; 2],
}

impl ZoneNoiseRange {
    pub fn new(day: (f64, f64), night: (f64, f64)) -> Self {
        Self {
            day_db: [day.0, day.1],
            night_db: [night.0, night.1],
        }
    }

    pub fn for_period(&self, period: DayNight) -> (f64, f64) {
        let r = match period {
            DayNight::Day => self.day_db,
            DayNight::Night => self.night_db,
        };
        (r[0], r[1])
    }
}

fn default_zones() -> BTreeMap<String, ZoneNoiseRange> {
    [
        ("HD-Urban-V0", (55.0, 65.0), (45.0, 55.0)),
        ("HD-Urban-V1", (55.0, 65.0), (45.0, 55.0)),
        ("MD-Urban-V2", (50.0, 60.0), (40.0, 50.0)),
        ("LD-Urban-V3", (45.0, 55.0), (35.0, 45.0)),
        ("Ind-Zone-V0", (60.0, 70.0), (50.0, 60.0)),
        ("Roadside-V1", (60.0, 70.0), (50.0, 60.0)),
        ("Roadside-V2", (55.0, 65.0), (45.0, 55.0)),
        ("Roadside-V3", (50.0, 60.0), (40.0, 50.0)),
        ("GreenEdge-V3", (40.0, 50.0), (30.0, 40.0)),
    ]
    .into_iter()
    .map(|(name, day, night)| (name.to_string(), ZoneNoiseRange::new(day, night)))
    .collect()
}

// ============================================================================
// Activity Limits
// ============================================================================

/// Per-activity comfort threshold and ISO/WHO ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityLimits {
    /// Minimum acceptable predicted comfort score
    #[serde(default = "default_comfort_threshold")]
    pub comfort_min: f64,

    /// ISO/WHO LAeq ceiling (dB); absent means no ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laeq_max_db: Option<f64>,

    /// ISO/WHO RT60 ceiling (s); absent means no ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt60_max_s: Option<f64>,
}

impl ActivityLimits {
    pub fn new(comfort_min: f64, laeq_max_db: f64, rt60_max_s: f64) -> Self {
        Self {
            comfort_min,
            laeq_max_db: Some(laeq_max_db),
            rt60_max_s: Some(rt60_max_s),
        }
    }
}

fn default_activities() -> BTreeMap<String, ActivityLimits> {
    [
        ("Sleeping", 0.85, 30.0, 0.5),
        ("Working", 0.75, 40.0, 0.6),
        ("Learning", 0.80, 35.0, 0.6),
        ("Living", 0.70, 35.0, 0.6),
        ("Healing", 0.80, 30.0, 0.5),
        ("Co-working", 0.75, 45.0, 0.7),
        ("Exercise", 0.60, 50.0, 0.9),
        ("Dining", 0.65, 45.0, 0.8),
    ]
    .into_iter()
    .map(|(name, comfort, laeq, rt60)| (name.to_string(), ActivityLimits::new(comfort, laeq, rt60)))
    .collect()
}

// ============================================================================
// Material Catalogs
// ============================================================================

/// Element categories that carry an absorption catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    Wall,
    Window,
    Floor,
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialCategory::Wall => write!(f, "wall"),
            MaterialCategory::Window => write!(f, "window"),
            MaterialCategory::Floor => write!(f, "floor"),
        }
    }
}

/// Absorption coefficient catalogs, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialCatalog {
    #[serde(default = "default_wall_materials")]
    pub wall: Vec<MaterialCandidate>,
    #[serde(default = "default_window_materials")]
    pub window: Vec<MaterialCandidate>,
    #[serde(default = "default_floor_materials")]
    pub floor: Vec<MaterialCandidate>,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self {
            wall: default_wall_materials(),
            window: default_window_materials(),
            floor: default_floor_materials(),
        }
    }
}

impl MaterialCatalog {
    pub fn category(&self, category: MaterialCategory) -> &[MaterialCandidate] {
        match category {
            MaterialCategory::Wall => &self.wall,
            MaterialCategory::Window => &self.window,
            MaterialCategory::Floor => &self.floor,
        }
    }

    /// Coefficient for a catalog entry whose name equals `material`, ignoring case.
    pub fn exact(&self, category: MaterialCategory, material: &str) -> Option<f64> {
        let wanted = material.trim().to_lowercase();
        self.category(category)
            .iter()
            .find(|m| m.name.to_lowercase() == wanted)
            .map(|m| m.absorption)
    }

    /// First catalog entry whose name appears inside `material`, ignoring case.
    ///
    /// "Painted Gypsum Board partition" resolves to "Gypsum Board". Catalog
    /// order decides between overlapping names.
    pub fn containing(&self, category: MaterialCategory, material: &str) -> Option<&MaterialCandidate> {
        let haystack = material.to_lowercase();
        self.category(category)
            .iter()
            .find(|m| haystack.contains(&m.name.to_lowercase()))
    }
}

fn catalog(entries: &[(&str, f64)]) -> Vec<MaterialCandidate> {
    entries
        .iter()
        .map(|&(name, absorption)| MaterialCandidate::new(name, absorption))
        .collect()
}

fn default_wall_materials() -> Vec<MaterialCandidate> {
    catalog(&[
        ("Painted Brick", 0.02),
        ("Unpainted Brick", 0.03),
        ("Concrete Block (Coarse)", 0.36),
        ("Concrete Block (Painted)", 0.07),
        ("Gypsum Board", 0.05),
        ("Plaster on Masonry", 0.02),
        ("Plaster with Wallpaper Backing", 0.03),
        ("Wood Paneling", 0.10),
        ("Acoustic Plaster", 0.50),
        ("Fiberglass Board", 0.80),
        // Listed last so the more specific "Concrete Block" names win substring matches
        ("Concrete", 0.02),
    ])
}

fn default_window_materials() -> Vec<MaterialCandidate> {
    catalog(&[
        ("Single Pane Glass", 0.04),
        ("Double Pane Glass", 0.07),
        ("Single Glazing", 0.04),
        ("Double Glazing", 0.07),
        ("Laminated Glass", 0.05),
        ("Wired Glass", 0.04),
        ("Frosted Glass", 0.03),
        ("Insulated Glazing Unit", 0.08),
        ("Glass Block", 0.02),
        ("Glazed Ceramic Tile", 0.01),
        ("Large Pane Glass", 0.04),
        ("Small Pane Glass", 0.03),
    ])
}

fn default_floor_materials() -> Vec<MaterialCandidate> {
    catalog(&[
        ("Marble", 0.01),
        ("Terrazzo", 0.02),
        ("Vinyl Tile", 0.03),
        ("Wood Parquet", 0.07),
        ("Wood Flooring on Joists", 0.10),
        ("Thin Carpet on Concrete", 0.10),
        ("Thin Carpet on Wood", 0.15),
        ("Medium Pile Carpet", 0.24),
        ("Thick Pile Carpet", 0.40),
        ("Cork Floor Tiles", 0.08),
    ])
}

// ============================================================================
// Guidance Text
// ============================================================================

/// Remediation text appended to failing-rule recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceConfig {
    /// General measures when LAeq falls outside the zone range
    #[serde(default = "default_laeq_guidance")]
    pub laeq_non_compliant: Vec<String>,

    /// General measures when RT60 falls outside the reverberation window
    #[serde(default = "default_rt60_guidance")]
    pub rt60_non_compliant: Vec<String>,

    /// Closing advice on a low comfort score
    #[serde(default = "default_comfort_note")]
    pub comfort_note: String,
}

fn default_laeq_guidance() -> Vec<String> {
    [
        "Upgrade glazing to laminated or insulated glazing units on exposed façades",
        "Seal gaps around window frames, doors and service penetrations",
        "Add acoustic trickle vents or mechanical ventilation so windows can stay closed",
        "Consider a barrier or planted buffer between the source and the façade",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_rt60_guidance() -> Vec<String> {
    [
        "Add absorptive wall finishes such as acoustic plaster or fiberglass panels",
        "Introduce soft furnishings, rugs and curtains to increase absorption",
        "Fit an acoustic ceiling or suspended baffles in the main living space",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_comfort_note() -> String {
    "Consider improving both noise insulation and absorption.".to_string()
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            laeq_non_compliant: default_laeq_guidance(),
            rt60_non_compliant: default_rt60_guidance(),
            comfort_note: default_comfort_note(),
        }
    }
}

// ============================================================================
// Physics Constants
// ============================================================================

/// Room-acoustics constants used by the physics fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Assumed source sound power level (dB)
    #[serde(default = "default_source_power_db")]
    pub source_power_db: f64,

    /// Sabine constant in `RT60 = k * V / A` (s/m)
    #[serde(default = "default_sabine_constant")]
    pub sabine_constant: f64,

    /// Storey height used to turn a floor level into a height (m)
    #[serde(default = "default_storey_height")]
    pub storey_height_m: f64,

    /// Absorption coefficient when no material resolves
    #[serde(default = "default_absorption")]
    pub default_absorption: f64,

    /// Ambient LAeq assumed without measurements (dB)
    #[serde(default = "default_laeq_db")]
    pub default_laeq_db: f64,

    /// Fraction of SPL remaining after a barrier
    #[serde(default = "default_barrier_factor")]
    pub barrier_factor: f64,

    /// Fraction of SPL remaining after the façade
    #[serde(default = "default_facade_factor")]
    pub facade_factor: f64,

    /// Comfort index assumed without measurements
    #[serde(default = "default_comfort_index")]
    pub default_comfort_index: f64,

    /// Divisor producing `absorption_norm`
    #[serde(default = "default_absorption_norm_divisor")]
    pub absorption_norm_divisor: f64,

    /// Divisor producing `rt60_norm`
    #[serde(default = "default_rt60_norm_divisor")]
    pub rt60_norm_divisor: f64,

    /// Divisor producing `spl_norm`
    #[serde(default = "default_spl_norm_divisor")]
    pub spl_norm_divisor: f64,

    /// Number of sound sources assumed
    #[serde(default = "default_source_count")]
    pub default_source_count: f64,

    /// Average source distance assumed (m)
    #[serde(default = "default_source_distance")]
    pub default_source_distance_m: f64,
}

fn default_source_power_db() -> f64 {
    85.0
}
fn default_sabine_constant() -> f64 {
    0.161
}
fn default_storey_height() -> f64 {
    3.0
}
fn default_absorption() -> f64 {
    0.1
}
fn default_laeq_db() -> f64 {
    45.0
}
fn default_barrier_factor() -> f64 {
    0.9
}
fn default_facade_factor() -> f64 {
    0.85
}
fn default_comfort_index() -> f64 {
    0.7
}
fn default_absorption_norm_divisor() -> f64 {
    0.5
}
fn default_rt60_norm_divisor() -> f64 {
    0.5
}
fn default_spl_norm_divisor() -> f64 {
    60.0
}
fn default_source_count() -> f64 {
    1.0
}
fn default_source_distance() -> f64 {
    2.0
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            source_power_db: default_source_power_db(),
            sabine_constant: default_sabine_constant(),
            storey_height_m: default_storey_height(),
            default_absorption: default_absorption(),
            default_laeq_db: default_laeq_db(),
            barrier_factor: default_barrier_factor(),
            facade_factor: default_facade_factor(),
            default_comfort_index: default_comfort_index(),
            absorption_norm_divisor: default_absorption_norm_divisor(),
            rt60_norm_divisor: default_rt60_norm_divisor(),
            spl_norm_divisor: default_spl_norm_divisor(),
            default_source_count: default_source_count(),
            default_source_distance_m: default_source_distance(),
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Historical dataset location. No path means the engine runs physics-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Linear Predictor
// ============================================================================

/// Coefficients for `LinearComfortModel`.
///
/// `weights` is keyed by numeric predictor column; `categorical` by
/// `"<column>=<value>"` and adds a fixed offset when the value matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    #[serde(default = "default_intercept")]
    pub intercept: f64,

    #[serde(default = "default_weights")]
    pub weights: BTreeMap<String, f64>,

    #[serde(default = "default_categorical_offsets")]
    pub categorical: BTreeMap<String, f64>,
}

fn default_intercept() -> f64 {
    0.95
}

fn default_weights() -> BTreeMap<String, f64> {
    [
        ("laeq_db", -0.006),
        ("rt60_s", -0.12),
        ("spl_db", -0.002),
        ("absorption_coefficient_by_area_m", 0.25),
        ("floor_height_m", 0.002),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_categorical_offsets() -> BTreeMap<String, f64> {
    [("day/nightstring=night", -0.02)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            intercept: default_intercept(),
            weights: default_weights(),
            categorical: default_categorical_offsets(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
