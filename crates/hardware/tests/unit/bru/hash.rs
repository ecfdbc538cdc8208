//! Index Hashing Tests.
//!
//! Verifies the three index schemes and the fold-XOR compression.

use bpsim_core::bru::hash::{IndexScheme, direct_index, fold_history, folded_index, xor_index};
use bpsim_core::bru::history::HistoryRegister;
use bpsim_core::common::Addr;
use proptest::prelude::*;

// ══════════════════════════════════════════════════════════
// 1. Fold-XOR
// ══════════════════════════════════════════════════════════

#[test]
fn fold_eight_bits_into_four() {
    // 0b0011 ^ 0b1011
    assert_eq!(fold_history(0b1011_0011, 8, 4), 0b1000);
}

#[test]
fn fold_exact_width_is_identity() {
    assert_eq!(fold_history(0b1010, 4, 4), 0b1010);
}

#[test]
fn fold_sixteen_bits_into_ten() {
    // Chunk 0 is 0b1, chunk 1 is bits 10..16 zero-padded.
    let h = 0xFC01;
    assert_eq!(fold_history(h, 16, 10), 0b1 ^ 0b111111);
}

#[test]
fn fold_all_zero_history() {
    assert_eq!(fold_history(0, 64, 10), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Index schemes
// ══════════════════════════════════════════════════════════

#[test]
fn direct_index_drops_alignment_bits() {
    assert_eq!(direct_index(Addr(0x0000_0010), 4), 0b0100);
    assert_eq!(direct_index(Addr(0x0000_0054), 4), 0b0101);
    assert_eq!(direct_index(Addr(0x0000_0003), 4), 0);
}

#[test]
fn folded_gshare_index_example() {
    let ghr = HistoryRegister::with_value(8, 0b1011_0011);
    assert_eq!(folded_index(Addr(0x0000_0054), ghr, 4), 0b1101);
}

#[test]
fn xor_index_uses_low_history_bits_only() {
    let ghr = HistoryRegister::with_value(8, 0b1011_0011);
    assert_eq!(xor_index(Addr(0x0000_0054), ghr, 4), 0b0101 ^ 0b0011);
}

#[test]
fn direct_scheme_ignores_history() {
    let pc = Addr(0x1234);
    let a = IndexScheme::Direct.index(pc, HistoryRegister::with_value(8, 0xFF), 6);
    let b = IndexScheme::Direct.index(pc, HistoryRegister::new(8), 6);
    assert_eq!(a, b);
}

#[test]
fn schemes_agree_on_empty_history() {
    let pc = Addr(0xABCD_EF00);
    let ghr = HistoryRegister::new(12);
    let d = IndexScheme::Direct.index(pc, ghr, 10);
    assert_eq!(IndexScheme::Xor.index(pc, ghr, 10), d);
    assert_eq!(IndexScheme::Folded.index(pc, ghr, 10), d);
}

// ══════════════════════════════════════════════════════════
// 3. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fold_fits_in_width(h in any::<u64>(), len in 1usize..=64, width in 1u32..=24) {
        prop_assert!(fold_history(h, len, width) < (1u64 << width));
    }

    #[test]
    fn every_scheme_fits_in_index_bits(
        pc in any::<u32>(),
        h in any::<u64>(),
        len in 1usize..=64,
        bits in 1u32..=24,
    ) {
        let ghr = HistoryRegister::with_value(len, h);
        for scheme in [IndexScheme::Direct, IndexScheme::Xor, IndexScheme::Folded] {
            prop_assert!(scheme.index(Addr(pc), ghr, bits) < (1usize << bits));
        }
    }
}
