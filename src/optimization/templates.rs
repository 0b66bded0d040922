//! Slot-filled recommendation text
//!
//! One builder per recommendation category. Each embeds the measured value
//! and the bound it missed, then appends the configured guidance lines.

use crate::compliance::{
    THRESHOLD_COMFORT_MIN, THRESHOLD_RT60_MAX, THRESHOLD_RT60_TARGET, THRESHOLD_ZONE_MAX,
    THRESHOLD_ZONE_MIN,
};
use crate::config::GuidanceConfig;
use crate::types::{ComplianceVerdict, FeatureVector, MaterialCandidate, RecommendationSet, RuleKind};

pub const LAEQ_ZONE: &str = "LAeq_zone";
pub const RT60: &str = "RT60";
pub const COMFORT_SCORE: &str = "Comfort Score";
pub const ISO: &str = "ISO";
pub const WALL_UPGRADE: &str = "Wall Upgrade";

fn with_guidance(lead: String, lines: &[String]) -> String {
    if lines.is_empty() {
        return lead;
    }
    format!("{lead}\n- {}", lines.join("\n- "))
}

pub fn laeq_zone_text(laeq: f64, range: &str, guidance: &GuidanceConfig) -> String {
    with_guidance(
        format!("Measured LAeq is {laeq:.2} dB, which is outside the allowed range {range}."),
        &guidance.laeq_non_compliant,
    )
}

pub fn rt60_text(rt60: f64, target: f64, max: f64, guidance: &GuidanceConfig) -> String {
    with_guidance(
        format!("Measured RT60 is {rt60:.2} s, which is outside the allowed range ({target}-{max} s)."),
        &guidance.rt60_non_compliant,
    )
}

pub fn comfort_text(score: f64, threshold: f64, activity: &str, guidance: &GuidanceConfig) -> String {
    format!(
        "Comfort score is {score:.2}, below the required threshold of {threshold} for {activity}. {}",
        guidance.comfort_note
    )
}

pub fn iso_text(failures: &[String]) -> String {
    format!("ISO/WHO compliance failed: {}", failures.join("; "))
}

pub fn wall_upgrade_text(upgrade: &MaterialCandidate) -> String {
    format!("Try upgrading to: {} (abs={})", upgrade.name, upgrade.absorption)
}

/// Guidance entries for every failing category of `verdict`.
///
/// A fully compliant verdict yields an empty set.
pub fn build_recommendations(
    verdict: &ComplianceVerdict,
    vector: &FeatureVector,
    comfort_score: f64,
    activity: &str,
    guidance: &GuidanceConfig,
) -> RecommendationSet {
    let mut set = RecommendationSet::new();
    let bound = |key: &str| verdict.thresholds.get(key).copied();

    if !verdict.passed(RuleKind::ZoneNoise) {
        let range = match (bound(THRESHOLD_ZONE_MIN), bound(THRESHOLD_ZONE_MAX)) {
            (Some(min), Some(max)) => format!("({min}, {max})"),
            _ => "(unknown)".to_string(),
        };
        set.insert(LAEQ_ZONE, laeq_zone_text(vector.laeq_db, &range, guidance));
    }

    if !verdict.passed(RuleKind::Rt60) {
        if let (Some(target), Some(max)) = (bound(THRESHOLD_RT60_TARGET), bound(THRESHOLD_RT60_MAX)) {
            set.insert(RT60, rt60_text(vector.rt60_s, target, max, guidance));
        }
    }

    if !verdict.passed(RuleKind::ComfortScore) {
        if let Some(threshold) = bound(THRESHOLD_COMFORT_MIN) {
            set.insert(COMFORT_SCORE, comfort_text(comfort_score, threshold, activity, guidance));
        }
    }

    if !verdict.iso_failures.is_empty() {
        set.insert(ISO, iso_text(&verdict.iso_failures));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laeq_text_lists_guidance() {
        let guidance = GuidanceConfig {
            laeq_non_compliant: vec!["Seal gaps".to_string(), "Add barrier".to_string()],
            ..GuidanceConfig::default()
        };
        assert_eq!(
            laeq_zone_text(72.347, "(60, 70)", &guidance),
            "Measured LAeq is 72.35 dB, which is outside the allowed range (60, 70).\n- Seal gaps\n- Add barrier"
        );
    }

    #[test]
    fn test_rt60_text_without_guidance() {
        let guidance = GuidanceConfig {
            rt60_non_compliant: Vec::new(),
            ..GuidanceConfig::default()
        };
        assert_eq!(
            rt60_text(0.2776, 0.4, 0.8, &guidance),
            "Measured RT60 is 0.28 s, which is outside the allowed range (0.4-0.8 s)."
        );
    }

    #[test]
    fn test_comfort_text_quotes_both_values() {
        let text = comfort_text(0.6, 0.85, "Sleeping", &GuidanceConfig::default());
        assert_eq!(
            text,
            "Comfort score is 0.60, below the required threshold of 0.85 for Sleeping. \
             Consider improving both noise insulation and absorption."
        );
    }

    #[test]
    fn test_iso_and_upgrade_text() {
        let failures = vec!["LAeq > 30 dB".to_string(), "Comfort score < 0.85".to_string()];
        assert_eq!(
            iso_text(&failures),
            "ISO/WHO compliance failed: LAeq > 30 dB; Comfort score < 0.85"
        );
        assert_eq!(
            wall_upgrade_text(&MaterialCandidate::new("Fiberglass Board", 0.8)),
            "Try upgrading to: Fiberglass Board (abs=0.8)"
        );
    }
}
