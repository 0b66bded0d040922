//! RT60 rule - reverberation inside the global window

use super::mark;
use crate::compliance::{ComplianceRule, RuleInput};
use crate::types::{RuleKind, RuleOutcome};

/// The window is `[rt60_target_s, rt60_max_s]` from `[reference]`, the same
/// for every zone.
pub struct Rt60Rule;

impl ComplianceRule for Rt60Rule {
    fn kind(&self) -> RuleKind {
        RuleKind::Rt60
    }

    fn evaluate(&self, input: &RuleInput<'_>) -> RuleOutcome {
        let rt60 = input.vector.rt60_s;
        let target = input.config.reference.rt60_target_s;
        let max = input.config.reference.rt60_max_s;
        let passed = rt60.is_finite() && (target..=max).contains(&rt60);
        let verdict = if passed { "within" } else { "outside" };

        RuleOutcome {
            rule: self.kind(),
            passed,
            detail: format!(
                "{} RT60 ({rt60:.2}s) {verdict} acceptable range ({target}-{max}s)",
                mark(passed)
            ),
            failures: Vec::new(),
        }
    }
}
