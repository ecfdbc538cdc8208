//! Two-Level Local Branch Predictor.
//!
//! Level 1 is a Correlation Table of per-branch local history registers,
//! indexed by the PC. Level 2 is a Branch History Table (BHT) of saturating
//! counters indexed directly by the level-1 history, so the BHT holds
//! `2^history_length` counters shared by every branch.

use super::counter::SaturatingCounter;
use super::hash::direct_index;
use super::history::HistoryRegister;
use super::DirectionPredictor;
use crate::common::{Addr, ConfigError};
use crate::config::PredictorConfig;

/// Two-Level Local Predictor structure.
#[derive(Clone, Debug)]
pub struct TwoLevelPredictor {
    /// Level 1: one local history per correlation table slot.
    local_histories: Vec<HistoryRegister>,
    /// log2 of the correlation table size.
    index_bits: u32,
    /// Level 2: counters indexed by a local history value.
    bht: Vec<SaturatingCounter>,
}

impl TwoLevelPredictor {
    /// Creates a new Two-Level Predictor.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            local_histories: vec![HistoryRegister::new(config.history_length); config.entries],
            index_bits: config.index_bits(),
            bht: vec![
                SaturatingCounter::weakly_taken(config.counter_bits);
                1 << config.history_length
            ],
        })
    }

    /// Local history currently held for `pc`.
    pub fn local_history(&self, pc: Addr) -> HistoryRegister {
        self.local_histories[direct_index(pc, self.index_bits)]
    }

    /// BHT counter selected by a local history value.
    pub fn bht_counter(&self, history: HistoryRegister) -> SaturatingCounter {
        self.bht[history.value() as usize]
    }
}

impl DirectionPredictor for TwoLevelPredictor {
    fn name(&self) -> &'static str {
        "two-level"
    }

    /// Reads the local history for `pc` and predicts from the counter it selects.
    fn predict(&self, pc: Addr) -> bool {
        self.bht_counter(self.local_history(pc)).predicts_taken()
    }

    /// Trains the BHT counter selected by the level-1 entry as it stands now,
    /// then shifts the outcome into that entry.
    ///
    /// The level-1 value read here stands in for the history seen at
    /// prediction time. If another in-flight instance of the same branch has
    /// already updated the entry, the wrong counter is trained.
    fn update(&mut self, pc: Addr, _target: Addr, taken: bool) {
        let l1_idx = direct_index(pc, self.index_bits);
        let history = self.local_histories[l1_idx];
        let bht_idx = history.value() as usize;
        let counter = self.bht[bht_idx].train(taken);

        self.bht[bht_idx] = counter;
        self.local_histories[l1_idx] = history.shifted(taken);
    }
}
