//! Config validation: unknown-key detection with Levenshtein suggestions,
//! physical range checks and a NaN/Inf sweep.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.
//!
//! Zone names, activity names and predictor column keys are user-chosen, so
//! only the fields *below* them are checked.

use std::collections::HashSet;

use super::defaults::TYPO_SUGGESTION_MAX_DISTANCE;
use crate::types::NumericColumn;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Fields accepted inside every `[zones.<name>]` table.
const ZONE_FIELDS: &[&str] = &["day_db", "night_db"];

/// Fields accepted inside every `[activities.<name>]` table.
const ACTIVITY_FIELDS: &[&str] = &["comfort_min", "laeq_max_db", "rt60_max_s"];

/// Returns the fixed dotted key paths for EngineConfig.
///
/// Maintained by hand to match the struct hierarchy in engine_config.rs.
/// Tables keyed by user-chosen names are handled in `classify_key`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [reference]
        "reference",
        "reference.rt60_target_s",
        "reference.rt60_max_s",
        "reference.default_comfort_threshold",
        // [zones] / [activities]
        "zones",
        "activities",
        // [materials]
        "materials",
        "materials.wall",
        "materials.window",
        "materials.floor",
        // [guidance]
        "guidance",
        "guidance.laeq_non_compliant",
        "guidance.rt60_non_compliant",
        "guidance.comfort_note",
        // [physics]
        "physics",
        "physics.source_power_db",
        "physics.sabine_constant",
        "physics.storey_height_m",
        "physics.default_absorption",
        "physics.default_laeq_db",
        "physics.barrier_factor",
        "physics.facade_factor",
        "physics.default_comfort_index",
        "physics.absorption_norm_divisor",
        "physics.rt60_norm_divisor",
        "physics.spl_norm_divisor",
        "physics.default_source_count",
        "physics.default_source_distance_m",
        // [dataset]
        "dataset",
        "dataset.path",
        // [predictor]
        "predictor",
        "predictor.intercept",
        "predictor.weights",
        "predictor.categorical",
    ];
    keys.iter().copied().collect()
}

/// Outcome of checking one dotted key path.
enum KeyCheck {
    Known,
    /// Unknown key, with the paths it could plausibly have meant
    Unknown(Vec<String>),
}

fn classify_key(key: &str, known: &HashSet<&'static str>) -> KeyCheck {
    if known.contains(key) {
        return KeyCheck::Known;
    }

    for (section, fields) in [("zones.", ZONE_FIELDS), ("activities.", ACTIVITY_FIELDS)] {
        if let Some(rest) = key.strip_prefix(section) {
            return match rest.rsplit_once('.') {
                None => KeyCheck::Known,
                Some((_, field)) if fields.contains(&field) => KeyCheck::Known,
                Some((name, _)) => KeyCheck::Unknown(
                    fields.iter().map(|f| format!("{section}{name}.{f}")).collect(),
                ),
            };
        }
    }

    // Column names contain dots ("n._of_sound_sources_int"), so the whole
    // remainder is the column.
    if let Some(column) = key.strip_prefix("predictor.weights.") {
        return if NumericColumn::from_name(column).is_some() {
            KeyCheck::Known
        } else {
            KeyCheck::Unknown(
                NumericColumn::ALL
                    .iter()
                    .map(|c| format!("predictor.weights.{}", c.name()))
                    .collect(),
            )
        };
    }
    if key.starts_with("predictor.categorical.") {
        return KeyCheck::Known;
    }

    KeyCheck::Unknown(known.iter().map(|k| k.to_string()).collect())
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest candidate for an unknown key, if within edit distance 3.
///
/// Ties keep the alphabetically first candidate so output is stable.
pub fn suggest_correction<I, S>(unknown: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<(String, usize)> = None;
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let dist = levenshtein(unknown, candidate);
        if dist > TYPO_SUGGESTION_MAX_DISTANCE {
            continue;
        }
        let better = match best {
            None => true,
            Some((ref k, d)) => dist < d || (dist == d && candidate < k.as_str()),
        };
        if better {
            best = Some((candidate.to_string(), dist));
        }
    }
    best.map(|(k, _)| k)
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    let mut warnings = Vec::new();

    for key in walk_toml_keys(&value, "") {
        if let KeyCheck::Unknown(candidates) = classify_key(&key, &known) {
            let suggestion = suggest_correction(&key, &candidates);
            warnings.push(ValidationWarning {
                message: format!("Unknown config key '{key}'"),
                field: key,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed EngineConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent use; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::EngineConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Absorption coefficients are energy fractions
    for (category, entries) in [
        ("wall", &config.materials.wall),
        ("window", &config.materials.window),
        ("floor", &config.materials.floor),
    ] {
        for m in entries {
            if !(0.0..=1.0).contains(&m.absorption) {
                errors.push(format!(
                    "materials.{category} '{}' absorption = {} is outside [0, 1]",
                    m.name, m.absorption
                ));
            }
        }
    }

    let p = &config.physics;
    for (name, value) in [
        ("sabine_constant", p.sabine_constant),
        ("storey_height_m", p.storey_height_m),
        ("absorption_norm_divisor", p.absorption_norm_divisor),
        ("rt60_norm_divisor", p.rt60_norm_divisor),
        ("spl_norm_divisor", p.spl_norm_divisor),
    ] {
        if value <= 0.0 {
            errors.push(format!("physics.{name} = {value} must be > 0"));
        }
    }
    if !(0.0..=1.0).contains(&p.default_absorption) {
        errors.push(format!(
            "physics.default_absorption = {} is outside [0, 1]",
            p.default_absorption
        ));
    }

    // Barrier/façade factors above 1.0 would amplify the source
    for (name, value) in [
        ("barrier_factor", p.barrier_factor),
        ("facade_factor", p.facade_factor),
    ] {
        if !(0.0..=1.0).contains(&value) {
            warnings.push(ValidationWarning {
                field: format!("physics.{name}"),
                message: format!("physics.{name} = {value} is outside the attenuating range (0-1)"),
                suggestion: None,
            });
        }
    }

    // Residential LAeq bands outside 20-100 dB are almost certainly typos
    for (name, zone) in &config.zones {
        for (period, range) in [("day_db", zone.day_db), ("night_db", zone.night_db)] {
            if range[0] < 20.0 || range[1] > 100.0 {
                warnings.push(ValidationWarning {
                    field: format!("zones.{name}.{period}"),
                    message: format!(
                        "zones.{name}.{period} = [{}, {}] is outside typical range (20-100 dB)",
                        range[0], range[1]
                    ),
                    suggestion: None,
                });
            }
        }
    }

    if config.reference.rt60_max_s > 3.0 {
        warnings.push(ValidationWarning {
            field: "reference.rt60_max_s".to_string(),
            message: format!(
                "reference.rt60_max_s = {:.2} is unusually long for a dwelling (> 3 s)",
                config.reference.rt60_max_s
            ),
            suggestion: None,
        });
    }

    if config.materials.wall.is_empty() {
        warnings.push(ValidationWarning {
            field: "materials.wall".to_string(),
            message: "materials.wall is empty; no wall upgrades can be proposed".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// NaN / Inf Sweep
// ============================================================================

/// Dotted paths of every non-finite float in the config, as error messages.
pub fn non_finite_values(config: &super::EngineConfig) -> Vec<String> {
    let mut errors = Vec::new();
    match toml::Value::try_from(config) {
        Ok(value) => collect_non_finite(&value, "", &mut errors),
        Err(e) => errors.push(format!("config could not be inspected for NaN/Inf: {e}")),
    }
    errors
}

fn collect_non_finite(value: &toml::Value, path: &str, errors: &mut Vec<String>) {
    match value {
        toml::Value::Float(f) if !f.is_finite() => {
            errors.push(format!("{path} = {f}: all values must be finite numbers"));
        }
        toml::Value::Table(table) => {
            for (k, v) in table {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                collect_non_finite(v, &child, errors);
            }
        }
        toml::Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                collect_non_finite(v, &format!("{path}[{i}]"), errors);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
