//! Comfort Score rule - per-activity minimum predicted comfort

use super::mark;
use crate::compliance::{ComplianceRule, RuleInput};
use crate::types::{RuleKind, RuleOutcome};

/// Threshold from `[activities]`, else `reference.default_comfort_threshold`.
/// A failure is also reported into the shared ISO/comfort bucket.
pub struct ComfortScoreRule;

impl ComplianceRule for ComfortScoreRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ComfortScore
    }

    fn evaluate(&self, input: &RuleInput<'_>) -> RuleOutcome {
        let score = input.comfort_score;
        let threshold = input.config.comfort_threshold(input.activity);
        let passed = score >= threshold;

        let (detail, failures) = if passed {
            (
                format!("{} Comfort score ({score:.3}) meets threshold ({threshold})", mark(true)),
                Vec::new(),
            )
        } else {
            (
                format!("{} Comfort score ({score:.3}) below threshold ({threshold})", mark(false)),
                vec![format!("Comfort score < {threshold}")],
            )
        };

        RuleOutcome {
            rule: self.kind(),
            passed,
            detail,
            failures,
        }
    }
}
