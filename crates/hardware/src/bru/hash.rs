//! Table indexing and history hashing.
//!
//! Pure functions from `(address, history)` to a table index of exactly
//! `index_bits` bits:
//! - **Direct:** `addr[(index_bits + 1):2]`.
//! - **Xor:** the PC slice XOR the raw low history bits.
//! - **Folded:** the PC slice XOR the fold-XOR compression of the whole history.

use super::history::HistoryRegister;
use crate::common::Addr;
use crate::common::addr::mask;

/// How a variant turns `(pc, history)` into a table index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexScheme {
    /// PC slice only; history is ignored.
    Direct,
    /// PC slice XOR `history[0:index_bits]`.
    Xor,
    /// PC slice XOR `fold_history(history, H, index_bits)`.
    Folded,
}

impl IndexScheme {
    /// Computes the index for `pc` under `history`.
    #[inline(always)]
    pub fn index(self, pc: Addr, history: HistoryRegister, index_bits: u32) -> usize {
        match self {
            Self::Direct => direct_index(pc, index_bits),
            Self::Xor => xor_index(pc, history, index_bits),
            Self::Folded => folded_index(pc, history, index_bits),
        }
    }
}

/// `addr[(index_bits + 1):2]`.
#[inline(always)]
pub fn direct_index(pc: Addr, index_bits: u32) -> usize {
    pc.word_index(index_bits)
}

/// PC slice XOR the `index_bits` most recent outcomes.
#[inline(always)]
pub fn xor_index(pc: Addr, history: HistoryRegister, index_bits: u32) -> usize {
    direct_index(pc, index_bits) ^ history.low_bits(index_bits) as usize
}

/// PC slice XOR the folded history.
#[inline(always)]
pub fn folded_index(pc: Addr, history: HistoryRegister, index_bits: u32) -> usize {
    direct_index(pc, index_bits)
        ^ fold_history(history.value(), history.len(), index_bits) as usize
}

/// Compresses an `len`-bit history into `width` bits.
///
/// The history is cut into `ceil(len / width)` chunks of `width` bits starting
/// at bit 0; the last chunk is zero-padded on its high side. All chunks are
/// XORed together. The result always fits in `width` bits.
pub fn fold_history(history: u64, len: usize, width: u32) -> u64 {
    if width == 0 {
        return 0;
    }
    let history = history & mask(len as u32);
    let chunk_mask = mask(width);
    let mut folded = 0;
    let mut offset = 0usize;
    while offset < len {
        folded ^= (history >> offset) & chunk_mask;
        offset += width as usize;
    }
    folded
}
