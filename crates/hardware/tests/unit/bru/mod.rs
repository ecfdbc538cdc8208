//! Branch prediction unit tests.

/// Bimodal predictor.
pub mod bimodal;
/// Index hashing and history folding.
pub mod hash;
/// Perceptron predictor.
pub mod perceptron;
/// The combined unit.
pub mod unit;
