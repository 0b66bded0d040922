//! Ecoform: Residential Acoustic Comfort Decision Engine
//!
//! Given a partial description of a dwelling (apartment type, zone, finishes,
//! floor, activity, time of day) the engine infers a complete acoustic
//! feature vector, scores it with an injected comfort predictor, checks it
//! against zone, reverberation, ISO/WHO and comfort rules, and suggests
//! remediation plus a wall-material upgrade.
//!
//! ## Architecture
//!
//! - **Inference**: four-tier dataset lookup with a room-acoustics fallback
//! - **Physics Engine**: Sabine RT60, reverberant SPL, reference room geometry
//! - **Predictor**: `ComfortPredictor` trait and the fixed model column contract
//! - **Compliance**: four independent rules, one verdict
//! - **Optimization**: absorption-catalog upgrade search and guidance text
//! - **Engine**: `DecisionEngine` facade and the dataset-first variant

pub mod compliance;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod inference;
pub mod normalize;
pub mod optimization;
pub mod physics_engine;
pub mod predictor;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, EngineConfig};

// Re-export commonly used types
pub use types::{
    ApartmentType, ComplianceVerdict, DayNight, DecisionResult, DwellingContext, FeatureVector,
    InferenceTier, MaterialCandidate, RecommendationSet, RuleKind,
};

// Re-export collaborators
pub use dataset::{CsvDataset, DatasetError, HistoricalDataset, InMemoryDataset, UnavailableDataset};
pub use predictor::{ComfortPredictor, FeatureFrame, LinearComfortModel, PredictorError};

// Re-export the engines
pub use engine::{DatasetFirstEngine, DecisionEngine, DecisionPhase, EngineError};
