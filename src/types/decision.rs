//! Inference provenance, recommendations and the final decision record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ComplianceVerdict;

/// How a feature vector's values were derived. Assigned once per inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InferenceTier {
    /// Normalized apartment type and zone both equal
    ExactMatch,
    /// Normalized apartment type and zone both contained in the row values
    PartialMatch,
    /// Zone relaxed, apartment type contained
    ApartmentOnlyMatch,
    /// No usable rows; synthesized from room acoustics
    PhysicsFallback,
}

impl InferenceTier {
    pub fn label(&self) -> &'static str {
        match self {
            InferenceTier::ExactMatch => "Tier 1: Exact apartment + zone match",
            InferenceTier::PartialMatch => "Tier 2: Partial apartment + zone match",
            InferenceTier::ApartmentOnlyMatch => "Tier 3: Apartment only match",
            InferenceTier::PhysicsFallback => "Tier 4: Global mean fallback",
        }
    }
}

impl std::fmt::Display for InferenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog entry: absorption coefficient and display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCandidate {
    pub name: String,
    pub absorption: f64,
}

impl MaterialCandidate {
    pub fn new(name: impl Into<String>, absorption: f64) -> Self {
        Self {
            name: name.into(),
            absorption,
        }
    }
}

/// Remediation text keyed by category ("LAeq_zone", "RT60", "Comfort Score",
/// "ISO", "Wall Upgrade"). Empty means fully compliant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationSet {
    entries: BTreeMap<String, String>,
}

impl RecommendationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(category.into(), text.into());
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries.get(category).map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Material suggestions surfaced to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestMaterials {
    /// Suggested wall finish; the current one when no upgrade was found
    pub wall_material: Option<String>,
}

/// Sole output of a decision. Created fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub comfort_score: f64,
    /// Human-readable provenance, e.g. "Inference Tier: Tier 4: Global mean fallback"
    pub source: String,
    /// `None` when the score came from a direct dataset hit
    pub tier: Option<InferenceTier>,
    pub compliance: ComplianceVerdict,
    pub recommendations: RecommendationSet,
    pub best_materials: BestMaterials,
    pub wall_upgrade: Option<MaterialCandidate>,
    /// Score re-predicted with the upgraded wall, when available
    pub improved_score: Option<f64>,
}
