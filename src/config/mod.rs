//! Engine Configuration Module
//!
//! Reference tables (zone noise ranges, RT60 window, activity limits,
//! material catalogs, guidance text) and physics constants loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `ECOFORM_CONFIG` environment variable (path to TOML file)
//! 2. `ecoform.toml` in the current working directory
//! 3. Built-in defaults (the stock reference tables)
//!
//! ## Usage
//!
//! There is no global instance. Load once and hand it to the engine:
//!
//! ```ignore
//! let config = Arc::new(EngineConfig::load());
//! let engine = DecisionEngine::new(config, dataset, predictor);
//! ```

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;
