//! Configuration system for the branch prediction unit.
//!
//! This module defines the configuration structure and enums used to
//! parameterize a predictor. It provides:
//! 1. **Defaults:** Baseline table sizes and widths.
//! 2. **Structures:** A flat `PredictorConfig` covering every variant.
//! 3. **Enums:** Direction predictor kind, target cache variant, and history shift order.
//! 4. **Validation:** Every constructor validates before allocating state.
//!
//! Configuration is supplied as JSON or built from one of the named presets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    ADDR_BITS, ALIGN_BITS, MAX_COUNTER_BITS, MAX_HISTORY_LENGTH, MAX_INDEX_BITS,
    MAX_LOCAL_HISTORY_LENGTH, MAX_WEIGHT_BITS,
};
use crate::common::{ConfigError, Error};

/// Default configuration constants.
mod defaults {
    /// Direction table entries (bimodal PHT, local history table, perceptron rows).
    pub const ENTRIES: usize = 1024;

    /// Global or local history length in bits.
    pub const HISTORY_LENGTH: usize = 8;

    /// Perceptron weight width in bits.
    pub const WEIGHT_BITS: u32 = 8;

    /// Direction counter width in bits (2-bit counters).
    pub const COUNTER_BITS: u32 = 2;

    /// GShare PHT index width (1024 entries).
    pub const PHT_INDEX_BITS: u32 = 10;

    /// Target cache entries.
    pub const BTB_ENTRIES: usize = 64;
}

/// Direction prediction algorithm.
///
/// Together with `use_hashing` this selects one of the named variants;
/// see [`PredictorConfig::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PredictorKind {
    /// No separate direction predictor: the counter-integrated BTB decides.
    #[serde(alias = "BTB")]
    Btb,
    /// PC-indexed table of saturating counters.
    Bimodal,
    /// Global history PHT with either a PC-only or PC XOR low-history-bits index.
    #[serde(alias = "Gshare")]
    GShare,
    /// Global history PHT indexed with fold-XOR compressed history.
    #[default]
    #[serde(alias = "GshareFolded")]
    GShareFolded,
    /// GShare PHT paired with its own private tagged BTB.
    #[serde(alias = "GshareBtb")]
    GShareBtb,
    /// Per-PC local history selecting a shared counter table.
    #[serde(alias = "TwoLevelLocal")]
    TwoLevel,
    /// Perceptron table with either a plain or hashed row index.
    Perceptron,
}

/// Target cache variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TargetCacheKind {
    /// Tag, target and a 2-bit counter per entry; entries invalidate on repeated not-taken.
    CounterIntegrated,
    /// Tag and target only; a hit means "has a cached target".
    #[default]
    TargetOnly,
}

/// When the GShare global history absorbs a resolved outcome, relative to
/// computing the PHT index that is trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HistoryUpdate {
    /// Shift the outcome in, then index the PHT with the new history.
    ShiftFirst,
    /// Index the PHT with the history as it was, then shift.
    ShiftLast,
}

/// Branch prediction unit configuration.
///
/// Fixed at construction; predictors never consult it again after building
/// their tables.
///
/// # Examples
///
/// ```
/// use bpsim_core::config::{PredictorConfig, PredictorKind};
///
/// let json = r#"{ "kind": "Perceptron", "history_length": 20, "use_hashing": false }"#;
/// let config = PredictorConfig::from_json(json).unwrap();
/// assert_eq!(config.kind, PredictorKind::Perceptron);
/// assert_eq!(config.weight_bits, 8);
/// assert_eq!(config.label(), "perceptron");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Direction predictor kind
    #[serde(default)]
    pub kind: PredictorKind,

    /// Direction table entries (bimodal PHT, local history table, perceptron rows)
    #[serde(default = "PredictorConfig::default_entries")]
    pub entries: usize,

    /// History register length in bits
    #[serde(default = "PredictorConfig::default_history_length")]
    pub history_length: usize,

    /// Perceptron weight width in bits
    #[serde(default = "PredictorConfig::default_weight_bits")]
    pub weight_bits: u32,

    /// Direction counter width in bits
    #[serde(default = "PredictorConfig::default_counter_bits")]
    pub counter_bits: u32,

    /// GShare PHT index width; the PHT holds `2^pht_index_bits` counters
    #[serde(default = "PredictorConfig::default_pht_index_bits")]
    pub pht_index_bits: u32,

    /// Mix low history bits into the index (GShare and Perceptron)
    #[serde(default = "PredictorConfig::default_use_hashing")]
    pub use_hashing: bool,

    /// Target cache entries
    #[serde(default = "PredictorConfig::default_btb_entries")]
    pub btb_entries: usize,

    /// Target cache variant
    #[serde(default)]
    pub target_cache: TargetCacheKind,

    /// GShare history shift order; `None` picks the variant's own order
    #[serde(default)]
    pub history_update: Option<HistoryUpdate>,
}

impl PredictorConfig {
    /// Returns the default direction table entry count.
    fn default_entries() -> usize {
        defaults::ENTRIES
    }

    /// Returns the default history length.
    fn default_history_length() -> usize {
        defaults::HISTORY_LENGTH
    }

    /// Returns the default perceptron weight width.
    fn default_weight_bits() -> u32 {
        defaults::WEIGHT_BITS
    }

    /// Returns the default direction counter width.
    fn default_counter_bits() -> u32 {
        defaults::COUNTER_BITS
    }

    /// Returns the default GShare PHT index width.
    fn default_pht_index_bits() -> u32 {
        defaults::PHT_INDEX_BITS
    }

    /// Hashing is on unless explicitly disabled.
    fn default_use_hashing() -> bool {
        true
    }

    /// Returns the default target cache entry count.
    fn default_btb_entries() -> usize {
        defaults::BTB_ENTRIES
    }

    /// Names of the built-in presets accepted by [`PredictorConfig::preset`].
    pub const PRESETS: &'static [&'static str] = &[
        "btb",
        "bimodal",
        "gshare",
        "gshare-folded",
        "gshare-btb",
        "twolevel",
        "per-t",
        "per-b",
    ];

    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed JSON and [`Error::Config`] when
    /// the values fail [`PredictorConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds one of the benchmark presets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if `name` is not in [`PredictorConfig::PRESETS`].
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let base = Self::default();
        let config = match name.to_ascii_lowercase().as_str() {
            "btb" => Self {
                kind: PredictorKind::Btb,
                target_cache: TargetCacheKind::CounterIntegrated,
                ..base
            },
            "bimodal" => Self {
                kind: PredictorKind::Bimodal,
                ..base
            },
            "gshare" => Self {
                kind: PredictorKind::GShare,
                ..base
            },
            "gshare-folded" => Self {
                kind: PredictorKind::GShareFolded,
                history_length: 16,
                ..base
            },
            "gshare-btb" => Self {
                kind: PredictorKind::GShareBtb,
                ..base
            },
            "twolevel" => Self {
                kind: PredictorKind::TwoLevel,
                entries: 256,
                ..base
            },
            "per-t" => Self {
                kind: PredictorKind::Perceptron,
                entries: 64,
                history_length: 20,
                use_hashing: false,
                ..base
            },
            "per-b" => Self {
                kind: PredictorKind::Perceptron,
                entries: 64,
                history_length: 20,
                use_hashing: true,
                ..base
            },
            _ => return Err(ConfigError::UnknownPreset(name.to_string())),
        };
        Ok(config)
    }

    /// Checks every parameter against the limits of the selected variant.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_table("entries", self.entries)?;
        check_table("btb_entries", self.btb_entries)?;

        if self.history_length < 1 {
            return Err(ConfigError::HistoryTooShort(self.history_length));
        }
        let (max_history, variant) = match self.kind {
            PredictorKind::TwoLevel => (MAX_LOCAL_HISTORY_LENGTH, "two-level local predictor"),
            _ => (MAX_HISTORY_LENGTH, "history register"),
        };
        if self.history_length > max_history {
            return Err(ConfigError::HistoryTooLong {
                value: self.history_length,
                max: max_history,
                variant,
            });
        }

        if !(2..=MAX_WEIGHT_BITS).contains(&self.weight_bits) {
            return Err(ConfigError::WeightBits {
                value: self.weight_bits,
                max: MAX_WEIGHT_BITS,
            });
        }
        if !(1..=MAX_COUNTER_BITS).contains(&self.counter_bits) {
            return Err(ConfigError::CounterBits {
                value: self.counter_bits,
                max: MAX_COUNTER_BITS,
            });
        }
        if !(1..=MAX_INDEX_BITS).contains(&self.pht_index_bits) {
            return Err(ConfigError::IndexBits {
                field: "pht_index_bits",
                value: self.pht_index_bits,
                max: MAX_INDEX_BITS,
            });
        }
        Ok(())
    }

    /// Index width of the direction table, `log2(entries)`.
    pub const fn index_bits(&self) -> u32 {
        self.entries.trailing_zeros()
    }

    /// Index width of the target cache, `log2(btb_entries)`.
    pub const fn btb_index_bits(&self) -> u32 {
        self.btb_entries.trailing_zeros()
    }

    /// Resolved GShare shift order.
    ///
    /// The folded variant shifts first; the others index with the history
    /// that was current before the outcome arrived.
    pub fn history_update(&self) -> HistoryUpdate {
        self.history_update.unwrap_or(match self.kind {
            PredictorKind::GShareFolded => HistoryUpdate::ShiftFirst,
            _ => HistoryUpdate::ShiftLast,
        })
    }

    /// Short name of the resolved variant, e.g. `gshare-folded`.
    pub const fn label(&self) -> &'static str {
        match (self.kind, self.use_hashing) {
            (PredictorKind::Btb, _) => "btb",
            (PredictorKind::Bimodal, _) => "bimodal",
            (PredictorKind::GShare, false) => "gshare-direct",
            (PredictorKind::GShare, true) => "gshare-xor",
            (PredictorKind::GShareFolded, _) => "gshare-folded",
            (PredictorKind::GShareBtb, _) => "gshare-btb",
            (PredictorKind::TwoLevel, _) => "two-level",
            (PredictorKind::Perceptron, false) => "perceptron",
            (PredictorKind::Perceptron, true) => "perceptron-hashed",
        }
    }
}

/// Rejects table sizes that are not powers of two or whose index would leave
/// no room for a tag.
pub(crate) fn check_table(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { field, value });
    }
    let bits = value.trailing_zeros();
    let max = MAX_INDEX_BITS.min(ADDR_BITS - ALIGN_BITS);
    if bits > max {
        return Err(ConfigError::IndexBits {
            field,
            value: bits,
            max,
        });
    }
    Ok(())
}

impl Default for PredictorConfig {
    /// Creates a default configuration: folded GShare with a target-only BTB.
    fn default() -> Self {
        Self {
            kind: PredictorKind::default(),
            entries: defaults::ENTRIES,
            history_length: defaults::HISTORY_LENGTH,
            weight_bits: defaults::WEIGHT_BITS,
            counter_bits: defaults::COUNTER_BITS,
            pht_index_bits: defaults::PHT_INDEX_BITS,
            use_hashing: true,
            btb_entries: defaults::BTB_ENTRIES,
            target_cache: TargetCacheKind::default(),
            history_update: None,
        }
    }
}

impl fmt::Display for PredictorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (entries={}, history={}, btb={} {:?})",
            self.label(),
            self.entries,
            self.history_length,
            self.btb_entries,
            self.target_cache
        )
    }
}
