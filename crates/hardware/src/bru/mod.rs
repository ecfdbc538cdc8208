//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors (bimodal, gshare, two-level
//! local, perceptron), the two branch target buffer variants, and the
//! [`BranchPredictionUnit`] that combines one of each.

pub use self::branch_predictor::{DirectionPredictor, Prediction, UpdateRequest};
pub use self::unit::BranchPredictionUnit;

/// Bimodal (PC-indexed counter table) predictor.
pub mod bimodal;

/// Direction predictor trait and request/response types.
pub mod branch_predictor;

/// Branch Target Buffer variants.
pub mod btb;

/// Saturating counters and perceptron weights.
pub mod counter;

/// Global history branch predictor (gshare algorithm) and its BTB-coupled variant.
pub mod gshare;

/// Table indexing and fold-XOR history hashing.
pub mod hash;

/// Branch history shift register.
pub mod history;

/// Perceptron-based neural branch predictor.
pub mod perceptron;

/// Two-level local history predictor.
pub mod two_level;

/// Branch prediction unit: direction predictor plus target cache.
pub mod unit;

use self::{
    bimodal::BimodalPredictor,
    gshare::{GShareBtbPredictor, GSharePredictor},
    perceptron::PerceptronPredictor,
    two_level::TwoLevelPredictor,
};
use crate::common::{Addr, ConfigError};
use crate::config::{PredictorConfig, PredictorKind};

/// Enum wrapper for static dispatch of direction predictors.
#[derive(Clone, Debug)]
pub enum DirectionPredictorWrapper {
    /// PC-indexed counters.
    Bimodal(BimodalPredictor),
    /// Direct, XOR or folded GShare.
    GShare(GSharePredictor),
    /// GShare with a private BTB.
    GShareBtb(GShareBtbPredictor),
    /// Two-level local history.
    TwoLevel(TwoLevelPredictor),
    /// Plain or hashed perceptron.
    Perceptron(PerceptronPredictor),
}

impl DirectionPredictorWrapper {
    /// Creates the direction predictor selected by `config`.
    ///
    /// Yields `None` for [`PredictorKind::Btb`], where the target cache
    /// decides direction on its own.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`],
    /// for every kind including [`PredictorKind::Btb`].
    pub fn new(config: &PredictorConfig) -> Result<Option<Self>, ConfigError> {
        let predictor = match config.kind {
            PredictorKind::Btb => {
                config.validate()?;
                return Ok(None);
            }
            PredictorKind::Bimodal => Self::Bimodal(BimodalPredictor::new(config)?),
            PredictorKind::GShare | PredictorKind::GShareFolded => {
                Self::GShare(GSharePredictor::new(config)?)
            }
            PredictorKind::GShareBtb => Self::GShareBtb(GShareBtbPredictor::new(config)?),
            PredictorKind::TwoLevel => Self::TwoLevel(TwoLevelPredictor::new(config)?),
            PredictorKind::Perceptron => Self::Perceptron(PerceptronPredictor::new(config)?),
        };
        Ok(Some(predictor))
    }
}

impl DirectionPredictor for DirectionPredictorWrapper {
    #[inline(always)]
    fn name(&self) -> &'static str {
        match self {
            Self::Bimodal(bp) => bp.name(),
            Self::GShare(bp) => bp.name(),
            Self::GShareBtb(bp) => bp.name(),
            Self::TwoLevel(bp) => bp.name(),
            Self::Perceptron(bp) => bp.name(),
        }
    }

    #[inline(always)]
    fn predict(&self, pc: Addr) -> bool {
        match self {
            Self::Bimodal(bp) => bp.predict(pc),
            Self::GShare(bp) => bp.predict(pc),
            Self::GShareBtb(bp) => bp.predict(pc),
            Self::TwoLevel(bp) => bp.predict(pc),
            Self::Perceptron(bp) => bp.predict(pc),
        }
    }

    #[inline(always)]
    fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        match self {
            Self::Bimodal(bp) => bp.update(pc, target, taken),
            Self::GShare(bp) => bp.update(pc, target, taken),
            Self::GShareBtb(bp) => bp.update(pc, target, taken),
            Self::TwoLevel(bp) => bp.update(pc, target, taken),
            Self::Perceptron(bp) => bp.update(pc, target, taken),
        }
    }

    #[inline(always)]
    fn predict_target(&self, pc: Addr) -> Option<Addr> {
        match self {
            Self::GShareBtb(bp) => bp.predict_target(pc),
            Self::Bimodal(_) | Self::GShare(_) | Self::TwoLevel(_) | Self::Perceptron(_) => None,
        }
    }
}
