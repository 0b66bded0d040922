//! Compliance verdict types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four independent compliance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleKind {
    /// LAeq inside the zone's day/night range
    ZoneNoise,
    /// RT60 inside the global reverberation window
    Rt60,
    /// Per-activity ISO/WHO ceilings
    IsoWho,
    /// Per-activity minimum comfort score
    ComfortScore,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::ZoneNoise => write!(f, "Zone Noise"),
            RuleKind::Rt60 => write!(f, "RT60"),
            RuleKind::IsoWho => write!(f, "ISO/WHO"),
            RuleKind::ComfortScore => write!(f, "Comfort Score"),
        }
    }
}

/// Result of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleKind,
    pub passed: bool,
    /// One human-readable pass/fail line
    pub detail: String,
    /// Failure strings this rule contributes to the shared ISO/comfort bucket
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Multi-rule compliance verdict. Built once by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub is_compliant: bool,
    pub reason: String,
    /// Exactly one outcome per rule, in evaluation order
    pub rules: Vec<RuleOutcome>,
    /// Shared bucket for ISO/WHO and comfort-threshold failures
    pub iso_failures: Vec<String>,
    /// Raw measured values the verdict was based on
    pub metrics: BTreeMap<String, f64>,
    /// Bounds that applied to this request
    pub thresholds: BTreeMap<String, f64>,
}

impl ComplianceVerdict {
    pub fn status(&self) -> &'static str {
        if self.is_compliant {
            "Compliant"
        } else {
            "Not Compliant"
        }
    }

    pub fn outcome(&self, rule: RuleKind) -> Option<&RuleOutcome> {
        self.rules.iter().find(|o| o.rule == rule)
    }

    pub fn passed(&self, rule: RuleKind) -> bool {
        self.outcome(rule).is_some_and(|o| o.passed)
    }
}
