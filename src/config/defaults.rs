//! Engine-wide default constants.
//!
//! Values that are not worth exposing in `ecoform.toml` but are shared
//! between modules. Grouped by subsystem for easy discovery.

// ============================================================================
// Config Discovery
// ============================================================================

/// Environment variable holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "ECOFORM_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "ecoform.toml";

/// Maximum Levenshtein distance for "did you mean" suggestions on config keys.
pub const TYPO_SUGGESTION_MAX_DISTANCE: usize = 3;

// ============================================================================
// Room Geometry
// ============================================================================

/// Clear ceiling height assumed for every apartment type (m).
pub const ROOM_HEIGHT_M: f64 = 3.0;

/// One-bedroom interior volume (m³) and floor area (m²).
pub const ONE_BED_VOLUME_M3: f64 = 58.0;
pub const ONE_BED_FLOOR_AREA_M2: f64 = 19.33;

/// Two-bedroom interior volume (m³) and floor area (m²). Also used for
/// unrecognized apartment types.
pub const TWO_BED_VOLUME_M3: f64 = 81.0;
pub const TWO_BED_FLOOR_AREA_M2: f64 = 27.00;

/// Three-bedroom interior volume (m³) and floor area (m²).
pub const THREE_BED_VOLUME_M3: f64 = 108.0;
pub const THREE_BED_FLOOR_AREA_M2: f64 = 36.00;

// ============================================================================
// Scoring & Rounding
// ============================================================================

/// Decimal places kept on predicted comfort scores.
pub const SCORE_DECIMALS: i32 = 3;

/// Decimal places kept on the floor-height override.
pub const FLOOR_HEIGHT_DECIMALS: i32 = 2;

/// Round `value` to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Labels
// ============================================================================

/// Placeholder for unknown categorical predictor inputs.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Provenance label on results served by the dataset-first path.
pub const DATASET_LOOKUP_SOURCE: &str = "Dataset lookup";

/// Activity assumed when the request does not name one.
pub const DEFAULT_ACTIVITY: &str = "Living";

/// Time period assumed when the request does not name one.
pub const DEFAULT_TIME_PERIOD: &str = "day";
