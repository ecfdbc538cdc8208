//! Direction Predictor Interface.
//!
//! This module defines the `DirectionPredictor` trait that every direction
//! policy implements. Variants are siblings, not layers: each one owns its
//! tables outright and is selected by configuration.

use serde::{Deserialize, Serialize};

use crate::common::Addr;

/// Combined direction and next-address prediction for one branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted direction.
    pub taken: bool,
    /// Predicted next fetch address: the cached target when taken with a
    /// target available, otherwise `pc + 4`.
    pub predicted_address: Addr,
}

impl Prediction {
    /// A not-taken prediction falling through to `pc + 4`.
    pub const fn fall_through(pc: Addr) -> Self {
        Self {
            taken: false,
            predicted_address: pc.next_sequential(),
        }
    }
}

/// A resolved branch reported back by the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Address of the branch instruction.
    pub address: Addr,
    /// Resolved target address.
    pub target: Addr,
    /// Resolved direction.
    pub taken: bool,
}

/// Trait for branch direction prediction algorithms.
///
/// `predict` is a pure read of the current state. `update` computes every new
/// table value from the state as it stood on entry and commits them together,
/// so no write made during an update is visible to a read in the same update.
pub trait DirectionPredictor {
    /// Short name of the variant, e.g. `gshare-folded`.
    fn name(&self) -> &'static str;

    /// Predicts whether the branch at `pc` will be taken.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    fn predict(&self, pc: Addr) -> bool;

    /// Trains the predictor with a resolved branch.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    /// * `target` - Resolved target address
    /// * `taken` - Whether the branch was actually taken
    fn update(&mut self, pc: Addr, target: Addr, taken: bool);

    /// Target supplied by storage private to the predictor, if it has any.
    ///
    /// Only variants that carry their own target store override this.
    fn predict_target(&self, _pc: Addr) -> Option<Addr> {
        None
    }
}
