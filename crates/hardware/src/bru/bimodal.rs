//! Bimodal Branch Predictor.
//!
//! A single table of saturating counters indexed directly by the PC. It has no
//! notion of history, so it captures per-branch bias and nothing else.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `update()` are O(1)
//! - **Space Complexity:** O(entries) counters
//! - **Best Case:** Strongly biased branches
//! - **Worst Case:** Alternating or history-correlated branches

use super::counter::SaturatingCounter;
use super::hash::direct_index;
use super::DirectionPredictor;
use crate::common::{Addr, ConfigError};
use crate::config::PredictorConfig;

/// Bimodal Predictor structure.
#[derive(Clone, Debug)]
pub struct BimodalPredictor {
    /// Counter table, initialized weakly taken.
    table: Vec<SaturatingCounter>,
    /// log2 of the table size.
    index_bits: u32,
}

impl BimodalPredictor {
    /// Creates a new Bimodal Predictor.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: vec![SaturatingCounter::weakly_taken(config.counter_bits); config.entries],
            index_bits: config.index_bits(),
        })
    }

    /// Counter currently guarding `pc`.
    pub fn counter(&self, pc: Addr) -> SaturatingCounter {
        self.table[direct_index(pc, self.index_bits)]
    }
}

impl DirectionPredictor for BimodalPredictor {
    fn name(&self) -> &'static str {
        "bimodal"
    }

    /// Taken iff the counter at `index(pc)` is in its upper half.
    fn predict(&self, pc: Addr) -> bool {
        self.counter(pc).predicts_taken()
    }

    /// Moves the counter at `index(pc)` towards the outcome.
    fn update(&mut self, pc: Addr, _target: Addr, taken: bool) {
        let idx = direct_index(pc, self.index_bits);
        let next = self.table[idx].train(taken);
        self.table[idx] = next;
    }
}
