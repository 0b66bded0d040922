//! Decision engine
//!
//! `DecisionEngine` runs the full pipeline for one context:
//! infer features → score once → evaluate compliance → build guidance →
//! search for a wall upgrade and re-score it.
//!
//! `DatasetFirstEngine` tries a direct exact dataset hit first and only
//! falls back to the full pipeline on a miss.

mod dataset_first;
mod error;
mod facade;

pub use dataset_first::DatasetFirstEngine;
pub use error::{DecisionPhase, EngineError};
pub use facade::DecisionEngine;
