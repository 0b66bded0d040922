//! Room-acoustics models
//!
//! Pure functions, no configuration lookups. Callers pass constants in.

use crate::config::defaults::{
    ONE_BED_FLOOR_AREA_M2, ONE_BED_VOLUME_M3, ROOM_HEIGHT_M, THREE_BED_FLOOR_AREA_M2,
    THREE_BED_VOLUME_M3, TWO_BED_FLOOR_AREA_M2, TWO_BED_VOLUME_M3,
};
use crate::types::ApartmentType;

/// Interior geometry of a reference apartment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomDimensions {
    pub volume_m3: f64,
    pub floor_area_m2: f64,
    pub height_m: f64,
}

impl RoomDimensions {
    /// Fixed reference geometry per apartment size class.
    pub fn for_apartment(apartment: ApartmentType) -> Self {
        let (volume_m3, floor_area_m2) = match apartment {
            ApartmentType::OneBed => (ONE_BED_VOLUME_M3, ONE_BED_FLOOR_AREA_M2),
            ApartmentType::TwoBed => (TWO_BED_VOLUME_M3, TWO_BED_FLOOR_AREA_M2),
            ApartmentType::ThreeBed => (THREE_BED_VOLUME_M3, THREE_BED_FLOOR_AREA_M2),
        };
        Self {
            volume_m3,
            floor_area_m2,
            height_m: ROOM_HEIGHT_M,
        }
    }

    /// Absorptive surface area (m²), see `surface_area`.
    pub fn surface_area(&self) -> f64 {
        surface_area(self.floor_area_m2, self.height_m)
    }
}

/// Rectangular-prism surface approximation (m²)
///
/// S = 2A + (A / h) × 2h
///
/// Floor and ceiling, plus a wall band whose length is the floor area over
/// the height. Returns the floor+ceiling area alone when `height <= 0`.
pub fn surface_area(floor_area: f64, height: f64) -> f64 {
    if height <= 0.0 {
        return floor_area * 2.0;
    }
    floor_area * 2.0 + (floor_area / height) * 2.0 * height
}

/// Total absorption in metric sabins
///
/// A = ᾱ × S
pub fn total_absorption(avg_coefficient: f64, surface: f64) -> f64 {
    avg_coefficient * surface
}

/// Sabine reverberation time (s)
///
/// RT60 = k × V / A, with k ≈ 0.161 s/m
///
/// Returns 0.0 when there is no absorption (the room would ring forever).
pub fn sabine_rt60(sabine_constant: f64, volume: f64, absorption: f64) -> f64 {
    if absorption <= 0.0 {
        return 0.0;
    }
    sabine_constant * volume / absorption
}

/// Reverberant sound pressure level (dB)
///
/// SPL = Lw − 10 × log₁₀(A)
///
/// Returns the source power unchanged when there is no absorption.
pub fn reverberant_spl(source_power_db: f64, absorption: f64) -> f64 {
    if absorption <= 0.0 {
        return source_power_db;
    }
    source_power_db - 10.0 * absorption.log10()
}

/// Scale `value` by a fixed divisor; a non-positive divisor yields 0.0.
pub fn normalized(value: f64, divisor: f64) -> f64 {
    if divisor <= 0.0 {
        return 0.0;
    }
    value / divisor
}

/// Arithmetic mean of resolved absorption coefficients, or `fallback` when
/// none resolved.
pub fn mean_absorption(coefficients: &[f64], fallback: f64) -> f64 {
    if coefficients.is_empty() {
        return fallback;
    }
    coefficients.iter().sum::<f64>() / coefficients.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dimensions() {
        let three = RoomDimensions::for_apartment(ApartmentType::ThreeBed);
        assert_eq!(three.volume_m3, 108.0);
        assert_eq!(three.floor_area_m2, 36.0);
        assert!((three.surface_area() - 144.0).abs() < 1e-9);

        let one = RoomDimensions::for_apartment(ApartmentType::OneBed);
        assert_eq!(one.volume_m3, 58.0);
        assert!((one.surface_area() - 77.32).abs() < 1e-9);
    }

    #[test]
    fn test_sabine_rt60() {
        // 108 m³ room, 62.64 sabins
        let rt60 = sabine_rt60(0.161, 108.0, 62.64);
        assert!((rt60 - 0.2776).abs() < 1e-3);
        assert_eq!(sabine_rt60(0.161, 108.0, 0.0), 0.0);
    }

    #[test]
    fn test_reverberant_spl() {
        let spl = reverberant_spl(85.0, 100.0);
        assert!((spl - 65.0).abs() < 1e-9);
        assert_eq!(reverberant_spl(85.0, 0.0), 85.0);
        assert_eq!(reverberant_spl(85.0, -3.0), 85.0);
    }

    #[test]
    fn test_mean_absorption_fallback() {
        assert_eq!(mean_absorption(&[], 0.1), 0.1);
        assert!((mean_absorption(&[0.80, 0.07], 0.1) - 0.435).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_guards_divisor() {
        assert_eq!(normalized(0.3, 0.5), 0.6);
        assert_eq!(normalized(0.3, 0.0), 0.0);
    }
}
