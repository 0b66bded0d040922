//! Input normalization
//!
//! Requests arrive as loosely keyed maps ("Zone", "Apartment Type", "l(a)eq",
//! "floor"). This module maps them onto the canonical field names and builds
//! a `DwellingContext` from the result.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{ApartmentType, ContextError, DwellingContext};

/// Matching key used for dataset and table lookups: lowercase with spaces and
/// hyphens removed. "HD-Urban V0" and "hdurbanv0" compare equal.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Clean a raw input key: trim, lowercase, spaces and hyphens to `_`,
/// parentheses dropped.
pub fn clean_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Canonical field name for a cleaned key, or the key itself when it has no alias.
fn alias(cleaned: &str) -> &str {
    match cleaned {
        "zone" => "zone_string",
        "apartment_type" | "apartmenttype" | "apt_type" | "apttype" => "apartment_type_string",
        "element" | "element_materials" => "element_materials_string",
        "floor_height" => "floor_height_m",
        "floor" | "floor_level" => "floor_level",
        "laeq" => "laeq_db",
        "spl" => "spl_db",
        "rt60" => "rt60_s",
        "absorption" => "absorption_coefficient_by_area_m",
        "surface_area" => "total_surface_sqm",
        "barrier_distance" => "barrier_distance_m",
        "barrier_height" => "barrier_height_m",
        "spl_after_barrier" => "spl_after_barrier_db",
        "spl_after_façade" | "spl_after_facade" => "spl_after_facade_dampening_db",
        "comfort_index" => "comfort_index_float",
        "wall" => "wall_material",
        "window" => "window_material",
        "period" | "time" => "time_period",
        other => other,
    }
}

/// Map arbitrary request keys onto canonical field names.
///
/// String values are trimmed and a non-blank apartment type is canonicalized
/// to "1Bed"/"2Bed"/"3Bed". When two raw keys map to the same field the later
/// one in iteration order wins.
pub fn standardize_input(input: &serde_json::Map<String, Value>) -> BTreeMap<String, Value> {
    let mut standardized = BTreeMap::new();
    for (key, value) in input {
        let field = alias(&clean_key(key)).to_string();
        let value = match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        };
        standardized.insert(field, value);
    }

    let canonical = match standardized.get("apartment_type_string") {
        Some(Value::String(apt)) if !apt.is_empty() => Some(canonical_apartment_type(apt)),
        _ => None,
    };
    if let Some(canonical) = canonical {
        standardized.insert(
            "apartment_type_string".to_string(),
            Value::String(canonical.as_str().to_string()),
        );
    }

    standardized
}

/// Canonicalize a free-form apartment type label; unrecognized labels are 2Bed.
pub fn canonical_apartment_type(label: &str) -> ApartmentType {
    ApartmentType::from_label(label)
}

fn non_blank(map: &BTreeMap<String, Value>, field: &str) -> Option<String> {
    match map.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_floor_level(value: &Value) -> Result<Option<u32>, ContextError> {
    let invalid = |reason: String| ContextError::InvalidField {
        field: "floor_level",
        reason,
    };
    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("{n} is not representable")))?,
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{s}' is not a number")))?,
        other => return Err(invalid(format!("unexpected value {other}"))),
    };
    if !number.is_finite() || number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(invalid(format!("{number} is not a non-negative whole storey")));
    }
    Ok(Some(number as u32))
}

impl DwellingContext {
    /// Build a context from a map produced by `standardize_input`.
    ///
    /// Zone and apartment type are required; activity defaults to "Living"
    /// and time period to "day".
    pub fn from_standardized(map: &BTreeMap<String, Value>) -> Result<Self, ContextError> {
        let zone = non_blank(map, "zone_string").ok_or(ContextError::MissingField("zone"))?;
        let apartment = non_blank(map, "apartment_type_string")
            .ok_or(ContextError::MissingField("apartment_type"))?;

        let mut ctx = DwellingContext::new(canonical_apartment_type(&apartment), zone);
        ctx.wall_material = non_blank(map, "wall_material");
        ctx.window_material = non_blank(map, "window_material");
        ctx.floor_material = non_blank(map, "floor_material");
        ctx.element_materials = non_blank(map, "element_materials_string");
        if let Some(level) = map.get("floor_level") {
            ctx.floor_level = parse_floor_level(level)?;
        }
        if let Some(activity) = non_blank(map, "activity") {
            ctx.activity = activity;
        }
        if let Some(period) = non_blank(map, "time_period") {
            ctx.time_period = period;
        }
        Ok(ctx)
    }

    /// Standardize a raw request map and build a context from it.
    pub fn from_raw(input: &serde_json::Map<String, Value>) -> Result<Self, ContextError> {
        Self::from_standardized(&standardize_input(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_normalize_key_strips_case_spaces_and_hyphens() {
        assert_eq!(normalize_key("HD-Urban V0"), "hdurbanv0");
        assert_eq!(normalize_key("2Bed"), "2bed");
    }

    #[test]
    fn test_loose_keys_are_aliased() {
        let input = raw(json!({
            " Zone ": "Roadside-V1",
            "Apartment Type": "two bed 2b",
            "L(A)eq": 52.0,
            "Floor": 4,
            "Element-Materials": " Wall: Concrete "
        }));
        let std = standardize_input(&input);
        assert_eq!(std["zone_string"], json!("Roadside-V1"));
        assert_eq!(std["apartment_type_string"], json!("2Bed"));
        assert_eq!(std["laeq_db"], json!(52.0));
        assert_eq!(std["floor_level"], json!(4));
        assert_eq!(std["element_materials_string"], json!("Wall: Concrete"));
    }

    #[test]
    fn test_context_from_raw_applies_defaults() {
        let input = raw(json!({
            "zone": "HD-Urban-V0",
            "apartment_type": "3BED",
            "wall_material": "Gypsum Board",
            "floor_level": "2"
        }));
        let ctx = DwellingContext::from_raw(&input).expect("valid context");
        assert_eq!(ctx.apartment_type, ApartmentType::ThreeBed);
        assert_eq!(ctx.floor_level, Some(2));
        assert_eq!(ctx.activity, "Living");
        assert_eq!(ctx.time_period, "day");
        assert_eq!(ctx.element_description(), "Wall: Gypsum Board");
    }

    #[test]
    fn test_missing_zone_is_invalid() {
        let input = raw(json!({ "apartment_type": "1Bed" }));
        assert_eq!(
            DwellingContext::from_raw(&input),
            Err(ContextError::MissingField("zone"))
        );
    }

    #[test]
    fn test_missing_apartment_type_is_invalid() {
        let input = raw(json!({ "zone": "HD-Urban-V0", "apartment_type": "  " }));
        assert_eq!(
            DwellingContext::from_raw(&input),
            Err(ContextError::MissingField("apartment_type"))
        );
    }

    #[test]
    fn test_blank_apartment_type_is_not_canonicalized() {
        let input = raw(json!({ "zone": "HD-Urban-V0", "apartment_type": "" }));
        let std = standardize_input(&input);
        assert_eq!(std["apartment_type_string"], json!(""));
    }

    #[test]
    fn test_negative_or_fractional_floor_is_rejected() {
        for bad in [json!(-1), json!(2.5), json!("ground")] {
            let input = raw(json!({ "zone": "Z", "apartment_type": "1Bed", "floor": bad }));
            assert!(matches!(
                DwellingContext::from_raw(&input),
                Err(ContextError::InvalidField { field: "floor_level", .. })
            ));
        }
    }

    #[test]
    fn test_float_floor_level_is_accepted() {
        let input = raw(json!({ "zone": "Z", "apartment_type": "1Bed", "floor_level": 3.0 }));
        let ctx = DwellingContext::from_raw(&input).expect("valid");
        assert_eq!(ctx.floor_level, Some(3));
    }
}
