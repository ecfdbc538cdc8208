//! Saturating counters.
//!
//! Two fixed-width integers that clamp instead of wrapping:
//! - [`SaturatingCounter`] is unsigned, `[0, 2^B - 1]`, and carries direction confidence.
//! - [`Weight`] is signed, `[-2^(W-1), 2^(W-1) - 1]`, and is one perceptron input weight.
//!
//! Both are `Copy` values whose operations return the next value; the owner
//! decides when to commit it back into its table.

/// An unsigned `B`-bit saturating counter.
///
/// The upper half of the range (`value >= 2^(B-1)`) predicts taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    value: u8,
    max: u8,
}

impl SaturatingCounter {
    /// Creates a counter of `bits` width holding `value`, clamped into range.
    ///
    /// `bits` must be in `1..=8`; configuration validation guarantees this.
    pub fn new(bits: u32, value: u8) -> Self {
        debug_assert!((1..=8).contains(&bits), "counter width {bits} out of range");
        let max = ((1u16 << bits) - 1) as u8;
        Self {
            value: value.min(max),
            max,
        }
    }

    /// Creates a counter in the weakly-taken state, `2^(B-1)`.
    ///
    /// For 2-bit counters this is 2.
    pub fn weakly_taken(bits: u32) -> Self {
        Self::new(bits, 1 << (bits - 1))
    }

    /// Current counter value.
    #[inline(always)]
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Largest representable value, `2^B - 1`.
    #[inline(always)]
    pub const fn max(self) -> u8 {
        self.max
    }

    /// `min(c + 1, max)`.
    #[inline(always)]
    #[must_use]
    pub fn increment(self) -> Self {
        Self {
            value: if self.value < self.max { self.value + 1 } else { self.max },
            ..self
        }
    }

    /// `max(c - 1, 0)`.
    #[inline(always)]
    #[must_use]
    pub const fn decrement(self) -> Self {
        Self {
            value: self.value.saturating_sub(1),
            ..self
        }
    }

    /// Increments on taken, decrements on not-taken.
    #[inline(always)]
    #[must_use]
    pub fn train(self, taken: bool) -> Self {
        if taken { self.increment() } else { self.decrement() }
    }

    /// Taken iff the counter sits in the upper half of its range.
    #[inline(always)]
    pub const fn predicts_taken(self) -> bool {
        self.value > self.max / 2
    }
}

/// A signed `W`-bit saturating weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weight {
    value: i16,
    bits: u8,
}

impl Weight {
    /// A zero weight of `bits` width. `bits` must be in `2..=16`.
    pub fn zero(bits: u32) -> Self {
        debug_assert!((2..=16).contains(&bits), "weight width {bits} out of range");
        Self {
            value: 0,
            bits: bits as u8,
        }
    }

    /// A weight of `bits` width holding `value`, clamped into range.
    pub fn new(bits: u32, value: i32) -> Self {
        Self::zero(bits).add(value)
    }

    /// Current weight value.
    #[inline(always)]
    pub const fn value(self) -> i32 {
        self.value as i32
    }

    /// Smallest representable value, `-2^(W-1)`.
    #[inline(always)]
    pub const fn min(self) -> i32 {
        -(1i32 << (self.bits - 1))
    }

    /// Largest representable value, `2^(W-1) - 1`.
    #[inline(always)]
    pub const fn max(self) -> i32 {
        (1i32 << (self.bits - 1)) - 1
    }

    /// Adds `delta` and clamps to the symmetric bounds.
    #[inline(always)]
    #[must_use]
    pub fn add(self, delta: i32) -> Self {
        let next = (self.value as i32).saturating_add(delta).clamp(self.min(), self.max());
        Self {
            value: next as i16,
            ..self
        }
    }

    /// Moves the weight one step towards `max` when `up`, towards `min` otherwise.
    #[inline(always)]
    #[must_use]
    pub fn step(self, up: bool) -> Self {
        self.add(if up { 1 } else { -1 })
    }
}
