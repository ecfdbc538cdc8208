//! Branch prediction unit models.
//!
//! This crate implements the branch predictors of a pipelined processor
//! front-end as cycle-stepped software models:
//! 1. **Building blocks:** Saturating counters, history registers, index hashing.
//! 2. **Direction:** Bimodal, GShare (direct, XOR, folded, BTB-coupled), two-level local, perceptron.
//! 3. **Targets:** Counter-integrated and target-only branch target buffers.
//! 4. **Unit:** A single predict/update interface combining direction and target.
//! 5. **Simulation:** Synthetic workloads, trace replay, and statistics.

/// Branch prediction unit (counters, predictors, BTBs, unit).
pub mod bru;
/// Common types (address, constants, errors).
pub mod common;
/// Predictor configuration (defaults, enums, validation, presets).
pub mod config;
/// Trace replay, workloads, and loading.
pub mod sim;
/// Prediction statistics collection and reporting.
pub mod stats;

/// The unit the front-end talks to.
pub use crate::bru::{BranchPredictionUnit, Prediction};
/// Address type.
pub use crate::common::Addr;
/// Root configuration type; use `PredictorConfig::default()` or deserialize from JSON.
pub use crate::config::PredictorConfig;
/// Trace replay driver.
pub use crate::sim::Simulator;
