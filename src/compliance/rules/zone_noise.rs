//! Zone Noise rule - LAeq inside the zone's day/night band

use super::mark;
use crate::compliance::{ComplianceRule, RuleInput};
use crate::types::{RuleKind, RuleOutcome};

/// Fails when LAeq is not finite, the zone is unknown, or LAeq sits outside
/// the band for the request's period.
pub struct ZoneNoiseRule;

impl ComplianceRule for ZoneNoiseRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ZoneNoise
    }

    fn evaluate(&self, input: &RuleInput<'_>) -> RuleOutcome {
        let laeq = input.vector.laeq_db;
        let range = input.zone_range();

        let passed = match range {
            Some((min, max)) if laeq.is_finite() => (min..=max).contains(&laeq),
            _ => false,
        };
        let range_text = match range {
            Some((min, max)) => format!("({min}, {max})"),
            None => "(unknown)".to_string(),
        };
        let verdict = if passed { "within" } else { "outside" };

        RuleOutcome {
            rule: self.kind(),
            passed,
            detail: format!(
                "{} LAeq ({laeq:.1} dB) {verdict} zone range {range_text}",
                mark(passed)
            ),
            failures: Vec::new(),
        }
    }
}
