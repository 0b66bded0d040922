//! Shared data structures for the acoustic decision engine
//!
//! - `DwellingContext`: partial request input
//! - `FeatureVector`: fixed-schema features fed to the comfort predictor
//! - `InferenceTier`: provenance of a feature vector
//! - `ComplianceVerdict`: four-rule compliance result
//! - `RecommendationSet` / `DecisionResult`: final output

mod compliance;
mod context;
mod decision;
mod features;

pub use compliance::*;
pub use context::*;
pub use decision::*;
pub use features::*;
