//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter. It keeps
//! a tagless Pattern History Table (PHT) of saturating counters and a Global
//! History Register (GHR) that absorbs every resolved branch. The variants
//! differ only in how `(pc, ghr)` becomes a PHT index:
//! - **Direct:** PC slice only.
//! - **Xor:** PC slice XOR the low GHR bits.
//! - **Folded:** PC slice XOR the fold-XOR compressed GHR.
//!
//! [`GShareBtbPredictor`] additionally pairs the PHT with a private tagged
//! target store and only predicts taken when both agree.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` O(1), folded index O(H / index_bits)
//! - **Space Complexity:** O(2^N) counters where N is `pht_index_bits`
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches or history length too short/long for pattern

use super::btb::TargetBtb;
use super::counter::SaturatingCounter;
use super::hash::IndexScheme;
use super::history::HistoryRegister;
use super::DirectionPredictor;
use crate::common::{Addr, ConfigError};
use crate::config::{HistoryUpdate, PredictorConfig, PredictorKind};

/// GShare Predictor structure.
#[derive(Clone, Debug)]
pub struct GSharePredictor {
    /// Global History Register storing recent branch outcomes.
    ghr: HistoryRegister,
    /// Pattern History Table of saturating counters.
    pht: Vec<SaturatingCounter>,
    /// PHT index width.
    index_bits: u32,
    /// Index hashing mode.
    scheme: IndexScheme,
    /// Whether training indexes with the history before or after the shift.
    order: HistoryUpdate,
}

impl GSharePredictor {
    /// Creates a new GShare Predictor.
    ///
    /// `GShareFolded` always folds; otherwise `use_hashing` chooses between the
    /// XOR and direct index.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        let scheme = match (config.kind, config.use_hashing) {
            (PredictorKind::GShareFolded, _) => IndexScheme::Folded,
            (_, true) => IndexScheme::Xor,
            (_, false) => IndexScheme::Direct,
        };
        Self::with_scheme(config, scheme, config.history_update())
    }

    /// Creates a GShare predictor with an explicit index scheme and shift order.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn with_scheme(
        config: &PredictorConfig,
        scheme: IndexScheme,
        order: HistoryUpdate,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let index_bits = config.pht_index_bits;
        Ok(Self {
            ghr: HistoryRegister::new(config.history_length),
            pht: vec![SaturatingCounter::weakly_taken(config.counter_bits); 1 << index_bits],
            index_bits,
            scheme,
            order,
        })
    }

    /// PHT index for `pc` under the current GHR.
    pub fn index(&self, pc: Addr) -> usize {
        self.scheme.index(pc, self.ghr, self.index_bits)
    }

    /// Current Global History Register.
    pub const fn history(&self) -> HistoryRegister {
        self.ghr
    }

    /// Counter at a raw PHT index.
    pub fn counter_at(&self, idx: usize) -> SaturatingCounter {
        self.pht[idx]
    }

    /// The index hashing mode.
    pub const fn scheme(&self) -> IndexScheme {
        self.scheme
    }

    /// The shift order used when training.
    pub const fn order(&self) -> HistoryUpdate {
        self.order
    }
}

impl DirectionPredictor for GSharePredictor {
    fn name(&self) -> &'static str {
        match self.scheme {
            IndexScheme::Direct => "gshare-direct",
            IndexScheme::Xor => "gshare-xor",
            IndexScheme::Folded => "gshare-folded",
        }
    }

    /// Taken iff `PHT[hash(pc, ghr)]` is in its upper half.
    fn predict(&self, pc: Addr) -> bool {
        self.pht[self.index(pc)].predicts_taken()
    }

    /// Trains `PHT[hash(pc, h)]` and shifts the outcome into the GHR, where `h`
    /// is the GHR after the shift (`ShiftFirst`) or before it (`ShiftLast`).
    fn update(&mut self, pc: Addr, _target: Addr, taken: bool) {
        let old_ghr = self.ghr;
        let new_ghr = old_ghr.shifted(taken);
        let index_ghr = match self.order {
            HistoryUpdate::ShiftFirst => new_ghr,
            HistoryUpdate::ShiftLast => old_ghr,
        };
        let idx = self.scheme.index(pc, index_ghr, self.index_bits);
        let counter = self.pht[idx].train(taken);

        self.pht[idx] = counter;
        self.ghr = new_ghr;
    }
}

/// GShare PHT coupled with a private tagged BTB.
///
/// Direction and target live in separate storage; the branch is predicted
/// taken only when the PHT says taken and the BTB holds a target for it.
#[derive(Clone, Debug)]
pub struct GShareBtbPredictor {
    /// Direction component.
    gshare: GSharePredictor,
    /// Private target store.
    btb: TargetBtb,
}

impl GShareBtbPredictor {
    /// Creates a new GShare+BTB predictor.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        let scheme = if config.use_hashing { IndexScheme::Xor } else { IndexScheme::Direct };
        Ok(Self {
            gshare: GSharePredictor::with_scheme(config, scheme, config.history_update())?,
            btb: TargetBtb::new(config.btb_entries)?,
        })
    }

    /// The direction component.
    pub const fn gshare(&self) -> &GSharePredictor {
        &self.gshare
    }
}

impl DirectionPredictor for GShareBtbPredictor {
    fn name(&self) -> &'static str {
        "gshare-btb"
    }

    fn predict(&self, pc: Addr) -> bool {
        self.gshare.predict(pc) && self.btb.lookup(pc).is_some()
    }

    fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        self.gshare.update(pc, target, taken);
        self.btb.update(pc, target, taken);
    }

    fn predict_target(&self, pc: Addr) -> Option<Addr> {
        self.btb.lookup(pc)
    }
}
