//! Dwelling context: the partial description a request starts from

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::defaults::{DEFAULT_ACTIVITY, DEFAULT_TIME_PERIOD, UNKNOWN_CATEGORY};

/// Canonical apartment size classes known to the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ApartmentType {
    #[serde(rename = "1Bed")]
    OneBed,
    #[serde(rename = "2Bed")]
    #[default]
    TwoBed,
    #[serde(rename = "3Bed")]
    ThreeBed,
}

impl ApartmentType {
    /// Canonical label as stored in the historical dataset ("1Bed", "2Bed", "3Bed").
    pub fn as_str(&self) -> &'static str {
        match self {
            ApartmentType::OneBed => "1Bed",
            ApartmentType::TwoBed => "2Bed",
            ApartmentType::ThreeBed => "3Bed",
        }
    }

    /// Map a free-form label to a size class.
    ///
    /// Anything mentioning `1BED`/`1B` is a one-bedroom, and so on. Labels that
    /// cannot be classified fall back to `TwoBed`.
    pub fn from_label(label: &str) -> Self {
        let upper = label.trim().to_uppercase();
        if upper.contains("1BED") || upper.contains("1B") {
            ApartmentType::OneBed
        } else if upper.contains("2BED") || upper.contains("2B") {
            ApartmentType::TwoBed
        } else if upper.contains("3BED") || upper.contains("3B") {
            ApartmentType::ThreeBed
        } else {
            ApartmentType::TwoBed
        }
    }
}

impl std::fmt::Display for ApartmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day/night split used by the zone noise tables and the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayNight {
    #[default]
    Day,
    Night,
}

impl DayNight {
    /// Night, evening and late periods use the night table; everything else is day.
    pub fn from_period(period: &str) -> Self {
        match period.trim().to_lowercase().as_str() {
            "night" | "evening" | "late" => DayNight::Night,
            _ => DayNight::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayNight::Day => "day",
            DayNight::Night => "night",
        }
    }
}

impl std::fmt::Display for DayNight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable request input.
///
/// Only `apartment_type` and `zone` are mandatory; everything else narrows
/// inference or compliance when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DwellingContext {
    pub apartment_type: ApartmentType,
    /// Zone label as supplied, e.g. "HD-Urban-V0"
    pub zone: String,
    #[serde(default)]
    pub wall_material: Option<String>,
    #[serde(default)]
    pub window_material: Option<String>,
    #[serde(default)]
    pub floor_material: Option<String>,
    /// Free-text element description, e.g. "Wall: Gypsum Board; Window: Double Glazing"
    #[serde(default)]
    pub element_materials: Option<String>,
    /// Storey index, ground floor = 0
    #[serde(default)]
    pub floor_level: Option<u32>,
    #[serde(default = "default_activity")]
    pub activity: String,
    #[serde(default = "default_time_period")]
    pub time_period: String,
}

fn default_activity() -> String {
    DEFAULT_ACTIVITY.to_string()
}

fn default_time_period() -> String {
    DEFAULT_TIME_PERIOD.to_string()
}

/// Request input that cannot be decided on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl DwellingContext {
    /// Minimal context with default activity ("Living") and period ("day").
    pub fn new(apartment_type: ApartmentType, zone: impl Into<String>) -> Self {
        Self {
            apartment_type,
            zone: zone.into(),
            wall_material: None,
            window_material: None,
            floor_material: None,
            element_materials: None,
            floor_level: None,
            activity: default_activity(),
            time_period: default_time_period(),
        }
    }

    pub fn with_wall(mut self, material: impl Into<String>) -> Self {
        self.wall_material = Some(material.into());
        self
    }

    pub fn with_window(mut self, material: impl Into<String>) -> Self {
        self.window_material = Some(material.into());
        self
    }

    pub fn with_floor_material(mut self, material: impl Into<String>) -> Self {
        self.floor_material = Some(material.into());
        self
    }

    pub fn with_element_materials(mut self, description: impl Into<String>) -> Self {
        self.element_materials = Some(description.into());
        self
    }

    pub fn with_floor_level(mut self, level: u32) -> Self {
        self.floor_level = Some(level);
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = activity.into();
        self
    }

    pub fn with_time_period(mut self, period: impl Into<String>) -> Self {
        self.time_period = period.into();
        self
    }

    pub fn day_night(&self) -> DayNight {
        DayNight::from_period(&self.time_period)
    }

    /// Element description for the predictor: explicit value, else built from
    /// the wall/window materials, else "Unknown".
    pub fn element_description(&self) -> String {
        if let Some(ref explicit) = self.element_materials {
            if !explicit.trim().is_empty() {
                return explicit.clone();
            }
        }
        let mut parts = Vec::new();
        if let Some(ref wall) = self.wall_material {
            parts.push(format!("Wall: {wall}"));
        }
        if let Some(ref window) = self.window_material {
            parts.push(format!("Window: {window}"));
        }
        if parts.is_empty() {
            UNKNOWN_CATEGORY.to_string()
        } else {
            parts.join("; ")
        }
    }

    /// Check the fields the engine cannot run without.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.zone.trim().is_empty() {
            return Err(ContextError::MissingField("zone"));
        }
        if self.activity.trim().is_empty() {
            return Err(ContextError::InvalidField {
                field: "activity",
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
