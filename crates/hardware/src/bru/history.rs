//! Branch history shift register.

use crate::common::addr::mask;

/// A fixed-width shift register of branch outcomes.
///
/// Bit 0 holds the newest outcome. Shifting drops the oldest bit off the top,
/// so the value always fits in `len` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HistoryRegister {
    bits: u64,
    len: u32,
}

impl HistoryRegister {
    /// An all-not-taken register of `len` bits (`1..=64`).
    pub fn new(len: usize) -> Self {
        debug_assert!((1..=64).contains(&len), "history length {len} out of range");
        Self {
            bits: 0,
            len: len as u32,
        }
    }

    /// A register of `len` bits preloaded with `bits` (excess high bits dropped).
    pub fn with_value(len: usize, bits: u64) -> Self {
        let reg = Self::new(len);
        Self {
            bits: bits & mask(reg.len),
            ..reg
        }
    }

    /// Register width in bits.
    #[inline(always)]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    /// Always false; a register has at least one bit.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Raw register contents.
    #[inline(always)]
    pub const fn value(self) -> u64 {
        self.bits
    }

    /// Outcome recorded `i` branches ago (0 = most recent).
    #[inline(always)]
    pub const fn bit(self, i: usize) -> bool {
        (self.bits >> i) & 1 != 0
    }

    /// The `n` most recent outcomes, `history[0:n]`.
    #[inline(always)]
    pub const fn low_bits(self, n: u32) -> u64 {
        self.bits & mask(n)
    }

    /// The register after shifting `taken` in at bit 0.
    #[inline(always)]
    #[must_use]
    pub const fn shifted(self, taken: bool) -> Self {
        Self {
            bits: ((self.bits << 1) | taken as u64) & mask(self.len),
            len: self.len,
        }
    }

    /// Shifts `taken` in place.
    #[inline(always)]
    pub const fn push(&mut self, taken: bool) {
        *self = self.shifted(taken);
    }
}
