//! Perceptron Branch Predictor.
//!
//! Uses a single-layer perceptron to predict branch direction. Each table row
//! holds a bias weight plus one signed weight per global history bit. The
//! prediction is the sign of
//!
//! ```text
//! sum = bias + Σ (history[i] ? w[i] : -w[i])
//! ```
//!
//! Rows are selected either by the PC alone (plain) or by the PC XOR the low
//! history bits (hashed).

use tracing::trace;

use super::counter::Weight;
use super::hash::IndexScheme;
use super::history::HistoryRegister;
use super::DirectionPredictor;
use crate::common::{Addr, ConfigError};
use crate::common::constants::{THETA_BIAS, THETA_COEFF};
use crate::config::PredictorConfig;

/// Training threshold for a history of `history_length` bits:
/// `round(1.93 * H + 14)`.
pub fn training_threshold(history_length: usize) -> i32 {
    (THETA_COEFF * history_length as f64 + THETA_BIAS).round() as i32
}

/// Minimum signed width that holds any perceptron sum without overflow:
/// `ceil(log2((H + 1) * 2^(W - 1))) + 1`.
pub const fn sum_bits(history_length: usize, weight_bits: u32) -> u32 {
    let magnitude = (history_length as u64 + 1) << (weight_bits - 1);
    let ceil_log2 = if magnitude <= 1 { 0 } else { u64::BITS - (magnitude - 1).leading_zeros() };
    ceil_log2 + 1
}

/// One row of the perceptron table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerceptronEntry {
    /// Bias weight, trained towards the outcome on every training step.
    pub bias: Weight,
    /// Per-history-bit weights; `weights[i]` pairs with `history[i]`.
    pub weights: Vec<Weight>,
}

impl PerceptronEntry {
    /// A row of zero weights.
    fn new(history_length: usize, weight_bits: u32) -> Self {
        Self {
            bias: Weight::zero(weight_bits),
            weights: vec![Weight::zero(weight_bits); history_length],
        }
    }

    /// Dot product of this row with `history`, bias included.
    pub fn output(&self, history: HistoryRegister) -> i32 {
        self.weights
            .iter()
            .enumerate()
            .fold(self.bias.value(), |sum, (i, w)| {
                if history.bit(i) { sum + w.value() } else { sum - w.value() }
            })
    }

    /// Applies one training step: the bias moves towards the outcome, each
    /// weight moves up where its history bit agreed with the outcome and down
    /// where it disagreed.
    fn train(&mut self, history: HistoryRegister, taken: bool) {
        self.bias = self.bias.step(taken);
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = w.step(history.bit(i) == taken);
        }
    }
}

/// Perceptron Predictor structure.
#[derive(Clone, Debug)]
pub struct PerceptronPredictor {
    /// Global History Register.
    ghr: HistoryRegister,
    /// Table of weight rows.
    rows: Vec<PerceptronEntry>,
    /// log2 of the row count.
    index_bits: u32,
    /// Row selection: `Direct` (plain) or `Xor` (hashed).
    scheme: IndexScheme,
    /// Training threshold (theta).
    threshold: i32,
}

impl PerceptronPredictor {
    /// Creates a new Perceptron Predictor.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug_assert!(sum_bits(config.history_length, config.weight_bits) <= i32::BITS);
        Ok(Self {
            ghr: HistoryRegister::new(config.history_length),
            rows: vec![PerceptronEntry::new(config.history_length, config.weight_bits); config.entries],
            index_bits: config.index_bits(),
            scheme: if config.use_hashing { IndexScheme::Xor } else { IndexScheme::Direct },
            threshold: training_threshold(config.history_length),
        })
    }

    /// Row index for `pc` under the current history.
    pub fn index(&self, pc: Addr) -> usize {
        self.scheme.index(pc, self.ghr, self.index_bits)
    }

    /// The row currently selected by `pc`.
    pub fn entry(&self, pc: Addr) -> &PerceptronEntry {
        &self.rows[self.index(pc)]
    }

    /// Perceptron output for `pc` under the current history.
    pub fn output(&self, pc: Addr) -> i32 {
        self.entry(pc).output(self.ghr)
    }

    /// Training threshold (theta).
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Current Global History Register.
    pub const fn history(&self) -> HistoryRegister {
        self.ghr
    }
}

impl DirectionPredictor for PerceptronPredictor {
    fn name(&self) -> &'static str {
        match self.scheme {
            IndexScheme::Xor | IndexScheme::Folded => "perceptron-hashed",
            IndexScheme::Direct => "perceptron",
        }
    }

    /// Taken iff the output is non-negative.
    fn predict(&self, pc: Addr) -> bool {
        self.output(pc) >= 0
    }

    /// Trains on a misprediction or a low-confidence output, then shifts the
    /// outcome into the history.
    ///
    /// The output is recomputed from the history held when the update arrives,
    /// which is the prediction-time history only when no other branch resolved
    /// in between.
    fn update(&mut self, pc: Addr, _target: Addr, taken: bool) {
        let ghr = self.ghr;
        let idx = self.scheme.index(pc, ghr, self.index_bits);
        let sum = self.rows[idx].output(ghr);
        let mispredicted = (sum >= 0) != taken;

        if mispredicted || sum.abs() <= self.threshold {
            trace!(pc = %pc, idx, sum, mispredicted, "perceptron train");
            self.rows[idx].train(ghr, taken);
        }
        self.ghr = ghr.shifted(taken);
    }
}
