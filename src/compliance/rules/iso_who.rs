//! ISO/WHO rule - per-activity LAeq and RT60 ceilings

use super::mark;
use crate::compliance::{ComplianceRule, RuleInput};
use crate::types::{RuleKind, RuleOutcome};

/// Each exceeded ceiling adds a failure string. Only positive measurements
/// are checked; an activity without limits contributes nothing.
pub struct IsoWhoRule;

impl ComplianceRule for IsoWhoRule {
    fn kind(&self) -> RuleKind {
        RuleKind::IsoWho
    }

    fn evaluate(&self, input: &RuleInput<'_>) -> RuleOutcome {
        let Some(limits) = input.activity_limits() else {
            return RuleOutcome {
                rule: self.kind(),
                passed: true,
                detail: format!("{} No ISO/WHO limits for activity '{}'", mark(true), input.activity),
                failures: Vec::new(),
            };
        };

        let laeq = input.vector.laeq_db;
        let rt60 = input.vector.rt60_s;
        let mut failures = Vec::new();
        if let Some(max) = limits.laeq_max_db {
            if laeq > 0.0 && laeq > max {
                failures.push(format!("LAeq > {max} dB"));
            }
        }
        if let Some(max) = limits.rt60_max_s {
            if rt60 > 0.0 && rt60 > max {
                failures.push(format!("RT60 > {max} s"));
            }
        }

        let passed = failures.is_empty();
        let detail = if passed {
            format!("{} ISO/WHO limits met for {}", mark(true), input.activity)
        } else {
            format!(
                "{} ISO/WHO limits exceeded for {}: {}",
                mark(false),
                input.activity,
                failures.join(", ")
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
