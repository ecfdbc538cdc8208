//! Branch Target Buffer (BTB).
//!
//! The BTB is a direct-mapped cache from branch address to last-seen target.
//! Two variants exist side by side:
//! 1. **[`CounterBtb`]:** each entry also carries a 2-bit counter, so the BTB can
//!    decide direction on its own and drops branches that stop being taken.
//! 2. **[`TargetBtb`]:** tag and target only; direction is decided elsewhere.
//!
//! Both index with `addr[(index_bits + 1):2]` and tag with the remaining
//! `ADDR_BITS - index_bits - 2` high bits.

use tracing::trace;

use super::counter::SaturatingCounter;
use super::hash::direct_index;
use super::Prediction;
use crate::common::{Addr, ConfigError};
use crate::config::{PredictorConfig, TargetCacheKind, check_table};

/// Width of the counter kept in a [`CounterBtb`] entry.
const BTB_COUNTER_BITS: u32 = 2;

/// An entry in the counter-integrated BTB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterEntry {
    /// Indicates if this entry contains valid data.
    pub valid: bool,
    /// Address bits above the index field.
    pub tag: u32,
    /// Last resolved taken target.
    pub target: Addr,
    /// Direction confidence.
    pub counter: SaturatingCounter,
}

impl Default for CounterEntry {
    fn default() -> Self {
        Self {
            valid: false,
            tag: 0,
            target: Addr::default(),
            counter: SaturatingCounter::new(BTB_COUNTER_BITS, 0),
        }
    }
}

/// Counter-integrated Branch Target Buffer (variant A).
#[derive(Clone, Debug)]
pub struct CounterBtb {
    /// The table of BTB entries.
    table: Vec<CounterEntry>,
    /// log2 of the entry count.
    index_bits: u32,
}

impl CounterBtb {
    /// Creates a cold BTB with `entries` slots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] unless `entries` is a power of
    /// two, or [`ConfigError::IndexBits`] if it leaves no room for a tag.
    pub fn new(entries: usize) -> Result<Self, ConfigError> {
        check_table("btb_entries", entries)?;
        Ok(Self {
            table: vec![CounterEntry::default(); entries],
            index_bits: entries.trailing_zeros(),
        })
    }

    /// Returns the entry for `pc` if it is valid and its tag matches.
    pub fn lookup(&self, pc: Addr) -> Option<&CounterEntry> {
        let e = &self.table[direct_index(pc, self.index_bits)];
        (e.valid && e.tag == pc.tag(self.index_bits)).then_some(e)
    }

    /// Taken iff the entry hits and its counter is at least 2.
    pub fn predict(&self, pc: Addr) -> Prediction {
        match self.lookup(pc) {
            Some(e) if e.counter.predicts_taken() => Prediction {
                taken: true,
                predicted_address: e.target,
            },
            _ => Prediction::fall_through(pc),
        }
    }

    /// Trains the entry for `pc`.
    ///
    /// - Tag hit, taken: counter increments and the target is refreshed.
    /// - Tag hit, not taken, counter 0 or 1: the entry is invalidated.
    /// - Tag hit, not taken, counter 2 or 3: counter decrements.
    /// - Tag miss: allocate with counter 2 only if taken.
    pub fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        let idx = direct_index(pc, self.index_bits);
        let tag = pc.tag(self.index_bits);
        let current = self.table[idx];

        let next = if current.valid && current.tag == tag {
            if taken {
                CounterEntry {
                    target,
                    counter: current.counter.increment(),
                    ..current
                }
            } else if current.counter.value() <= 1 {
                trace!(pc = %pc, idx, "btb invalidate");
                CounterEntry::default()
            } else {
                CounterEntry {
                    counter: current.counter.decrement(),
                    ..current
                }
            }
        } else if taken {
            trace!(pc = %pc, target = %target, idx, "btb allocate");
            CounterEntry {
                valid: true,
                tag,
                target,
                counter: SaturatingCounter::weakly_taken(BTB_COUNTER_BITS),
            }
        } else {
            current
        };

        self.table[idx] = next;
    }
}

/// An entry in the target-only BTB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetEntry {
    /// Indicates if this entry contains valid data.
    pub valid: bool,
    /// Address bits above the index field.
    pub tag: u32,
    /// Last resolved taken target.
    pub target: Addr,
}

/// Target-only Branch Target Buffer (variant B).
#[derive(Clone, Debug)]
pub struct TargetBtb {
    /// The table of BTB entries.
    table: Vec<TargetEntry>,
    /// log2 of the entry count.
    index_bits: u32,
}

impl TargetBtb {
    /// Creates a cold BTB with `entries` slots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] unless `entries` is a power of
    /// two, or [`ConfigError::IndexBits`] if it leaves no room for a tag.
    pub fn new(entries: usize) -> Result<Self, ConfigError> {
        check_table("btb_entries", entries)?;
        Ok(Self {
            table: vec![TargetEntry::default(); entries],
            index_bits: entries.trailing_zeros(),
        })
    }

    /// Looks up the cached target for `pc`.
    ///
    /// # Returns
    ///
    /// The target if a valid entry exists and the tag matches, otherwise `None`.
    pub fn lookup(&self, pc: Addr) -> Option<Addr> {
        let e = self.table[direct_index(pc, self.index_bits)];
        (e.valid && e.tag == pc.tag(self.index_bits)).then_some(e.target)
    }

    /// Taken iff the entry hits.
    pub fn predict(&self, pc: Addr) -> Prediction {
        self.lookup(pc).map_or_else(
            || Prediction::fall_through(pc),
            |target| Prediction {
                taken: true,
                predicted_address: target,
            },
        )
    }

    /// Allocates or overwrites the entry for `pc` when the branch was taken.
    /// Never invalidates.
    pub fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        if !taken {
            return;
        }
        let idx = direct_index(pc, self.index_bits);
        self.table[idx] = TargetEntry {
            valid: true,
            tag: pc.tag(self.index_bits),
            target,
        };
    }
}

/// The target cache paired with a direction predictor in a unit.
#[derive(Clone, Debug)]
pub enum TargetCache {
    /// Variant A.
    CounterIntegrated(CounterBtb),
    /// Variant B.
    TargetOnly(TargetBtb),
}

impl TargetCache {
    /// Builds the configured variant.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = match config.target_cache {
            TargetCacheKind::CounterIntegrated => {
                Self::CounterIntegrated(CounterBtb::new(config.btb_entries)?)
            }
            TargetCacheKind::TargetOnly => Self::TargetOnly(TargetBtb::new(config.btb_entries)?),
        };
        Ok(cache)
    }

    /// Cached target on a tag hit, regardless of any counter state.
    pub fn lookup(&self, pc: Addr) -> Option<Addr> {
        match self {
            Self::CounterIntegrated(btb) => btb.lookup(pc).map(|e| e.target),
            Self::TargetOnly(btb) => btb.lookup(pc),
        }
    }

    /// The variant's own combined prediction.
    pub fn predict(&self, pc: Addr) -> Prediction {
        match self {
            Self::CounterIntegrated(btb) => btb.predict(pc),
            Self::TargetOnly(btb) => btb.predict(pc),
        }
    }

    /// Forwards a resolved branch to the variant.
    pub fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        match self {
            Self::CounterIntegrated(btb) => btb.update(pc, target, taken),
            Self::TargetOnly(btb) => btb.update(pc, target, taken),
        }
    }
}
