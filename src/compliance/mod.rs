//! Compliance evaluation
//!
//! Four independent rules judge one scored feature vector. All four always
//! run; none short-circuits another.
//!
//! ## Rules
//!
//! 1. **Zone Noise** - LAeq inside the zone's day/night band
//! 2. **RT60** - reverberation inside the global target window
//! 3. **ISO/WHO** - per-activity LAeq and RT60 ceilings
//! 4. **Comfort Score** - per-activity minimum predicted comfort
//!
//! ISO/WHO and comfort failures share one bucket (`iso_failures`), which is
//! what the "ISO" recommendation quotes.

pub mod rules;

pub use rules::{ComfortScoreRule, IsoWhoRule, Rt60Rule, ZoneNoiseRule};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ActivityLimits, EngineConfig};
use crate::types::{ComplianceVerdict, DayNight, FeatureVector, RuleKind, RuleOutcome};

/// Everything a rule may look at for one request.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub vector: &'a FeatureVector,
    pub comfort_score: f64,
    pub activity: &'a str,
    pub zone: &'a str,
    pub period: DayNight,
    pub config: &'a EngineConfig,
}

impl RuleInput<'_> {
    /// Zone band for this request, if the zone is known.
    pub fn zone_range(&self) -> Option<(f64, f64)> {
        self.config.zone_range(self.zone, self.period)
    }

    pub fn activity_limits(&self) -> Option<&ActivityLimits> {
        self.config.activity(self.activity)
    }
}

/// One compliance rule.
pub trait ComplianceRule: Send + Sync {
    fn kind(&self) -> RuleKind;

    /// Judge the input. Failure strings destined for the shared ISO/comfort
    /// bucket go into `RuleOutcome::failures`.
    fn evaluate(&self, input: &RuleInput<'_>) -> RuleOutcome;
}

/// The four rules in evaluation order.
pub fn default_rules() -> Vec<Box<dyn ComplianceRule>> {
    vec![
        Box::new(ZoneNoiseRule),
        Box::new(Rt60Rule),
        Box::new(IsoWhoRule),
        Box::new(ComfortScoreRule),
    ]
}

/// Metric keys exposed on every verdict.
pub const METRIC_LAEQ: &str = "LAeq (dB)";
pub const METRIC_RT60: &str = "RT60 (s)";
pub const METRIC_SPL: &str = "SPL (dB)";
pub const METRIC_ABSORPTION: &str = "Absorption Coefficient";
pub const METRIC_SURFACE: &str = "Surface Area (m²)";

/// Threshold keys; zone and ISO entries only appear when they apply.
pub const THRESHOLD_ZONE_MIN: &str = "zone_laeq_min_db";
pub const THRESHOLD_ZONE_MAX: &str = "zone_laeq_max_db";
pub const THRESHOLD_RT60_TARGET: &str = "rt60_target_s";
pub const THRESHOLD_RT60_MAX: &str = "rt60_max_s";
pub const THRESHOLD_COMFORT_MIN: &str = "comfort_min";
pub const THRESHOLD_ISO_LAEQ_MAX: &str = "iso_laeq_max_db";
pub const THRESHOLD_ISO_RT60_MAX: &str = "iso_rt60_max_s";

pub struct ComplianceEvaluator {
    config: Arc<EngineConfig>,
    rules: Vec<Box<dyn ComplianceRule>>,
}

impl ComplianceEvaluator {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self::with_rules(config, default_rules())
    }

    pub fn with_rules(config: Arc<EngineConfig>, rules: Vec<Box<dyn ComplianceRule>>) -> Self {
        Self { config, rules }
    }

    pub fn evaluate(
        &self,
        vector: &FeatureVector,
        comfort_score: f64,
        activity: &str,
        zone: &str,
        time_period: &str,
    ) -> ComplianceVerdict {
        let input = RuleInput {
            vector,
            comfort_score,
            activity,
            zone,
            period: DayNight::from_period(time_period),
            config: &self.config,
        };

        let outcomes: Vec<RuleOutcome> = self.rules.iter().map(|r| r.evaluate(&input)).collect();
        let iso_failures: Vec<String> = outcomes
            .iter()
            .flat_map(|o| o.failures.iter().cloned())
            .collect();
        let is_compliant = outcomes.iter().all(|o| o.passed) && iso_failures.is_empty();

        let range = input
            .zone_range()
            .map(|(min, max)| format!("({min}, {max})"))
            .unwrap_or_else(|| "unknown".to_string());
        let details: Vec<&str> = outcomes.iter().map(|o| o.detail.as_str()).collect();
        let reason = format!(
            "Zone: {zone}, Period: {}, Range: {range}. {}",
            input.period,
            details.join(" | ")
        );

        tracing::debug!(
            zone,
            activity,
            is_compliant,
            failures = iso_failures.len(),
            "Compliance evaluated"
        );

        ComplianceVerdict {
            is_compliant,
            reason,
            rules: outcomes,
            iso_failures,
            metrics: metrics(vector),
            thresholds: thresholds(&input),
        }
    }
}

fn metrics(v: &FeatureVector) -> BTreeMap<String, f64> {
    [
        (METRIC_LAEQ, v.laeq_db),
        (METRIC_RT60, v.rt60_s),
        (METRIC_SPL, v.spl_db),
        (METRIC_ABSORPTION, v.absorption_coefficient),
        (METRIC_SURFACE, v.total_surface_sqm),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn thresholds(input: &RuleInput<'_>) -> BTreeMap<String, f64> {
    let reference = &input.config.reference;
    let mut out = BTreeMap::new();
    if let Some((min, max)) = input.zone_range() {
        out.insert(THRESHOLD_ZONE_MIN.to_string(), min);
        out.insert(THRESHOLD_ZONE_MAX.to_string(), max);
    }
    out.insert(THRESHOLD_RT60_TARGET.to_string(), reference.rt60_target_s);
    out.insert(THRESHOLD_RT60_MAX.to_string(), reference.rt60_max_s);
    out.insert(
        THRESHOLD_COMFORT_MIN.to_string(),
        input.config.comfort_threshold(input.activity),
    );
    if let Some(limits) = input.activity_limits() {
        if let Some(laeq) = limits.laeq_max_db {
            out.insert(THRESHOLD_ISO_LAEQ_MAX.to_string(), laeq);
        }
        if let Some(rt60) = limits.rt60_max_s {
            out.insert(THRESHOLD_ISO_RT60_MAX.to_string(), rt60);
        }
    }
    out
}
