//! Instruction address type.
//!
//! This module defines a strong type for branch and target addresses so that
//! raw table indices and addresses cannot be mixed by accident. It provides:
//! 1. **Type Safety:** `Addr` is distinct from the `usize` indices used by the tables.
//! 2. **Field Extraction:** Word-index and tag slices used by every indexing scheme.
//! 3. **Sequencing:** The fall-through (`pc + 4`) address used on a predicted not-taken.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{ADDR_BITS, ALIGN_BITS, INSTRUCTION_BYTES};

/// A 32-bit instruction address.
///
/// Instructions are 4-byte aligned; the low two bits never take part in
/// indexing or tag comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Addr(pub u32);

impl Addr {
    /// Creates a new address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Returns `addr[(index_bits + 1):2]`, the word index used by direct-mapped tables.
    ///
    /// # Arguments
    ///
    /// * `index_bits` - Width of the table index (log2 of the entry count).
    #[inline(always)]
    pub const fn word_index(self, index_bits: u32) -> usize {
        ((self.0 >> ALIGN_BITS) as u64 & mask(index_bits)) as usize
    }

    /// Returns the tag stored alongside a direct-mapped entry: every address bit
    /// above the index field.
    ///
    /// The tag is `ADDR_BITS - index_bits - 2` bits wide.
    #[inline(always)]
    pub const fn tag(self, index_bits: u32) -> u32 {
        let shift = index_bits + ALIGN_BITS;
        if shift >= ADDR_BITS { 0 } else { self.0 >> shift }
    }

    /// Returns the sequential (fall-through) address, `pc + 4`.
    #[inline(always)]
    pub const fn next_sequential(self) -> Self {
        Self(self.0.wrapping_add(INSTRUCTION_BYTES))
    }
}

impl From<u32> for Addr {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::LowerHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Returns a mask with the low `bits` bits set; saturates at 64.
#[inline(always)]
pub const fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}
