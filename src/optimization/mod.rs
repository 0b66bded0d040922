//! Material upgrade optimizer and recommendation text
//!
//! Entirely table-driven: the optimizer only walks the absorption catalog,
//! and the templates only slot measured values into configured guidance.
//! Re-scoring an upgraded vector is the caller's job.

mod material_optimizer;
pub mod templates;

pub use material_optimizer::{apply_wall_upgrade, recommend_upgrade};
