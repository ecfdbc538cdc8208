//! Bimodal Predictor Tests.

use bpsim_core::bru::DirectionPredictor;
use bpsim_core::bru::bimodal::BimodalPredictor;
use bpsim_core::common::Addr;
use bpsim_core::config::{PredictorConfig, PredictorKind};

use crate::common::{config, score_pattern, train};

fn bimodal(entries: usize) -> BimodalPredictor {
    BimodalPredictor::new(&PredictorConfig {
        entries,
        ..config(PredictorKind::Bimodal)
    })
    .unwrap()
}

#[test]
fn cold_table_predicts_weakly_taken() {
    let bp = bimodal(16);
    assert!(bp.predict(Addr(0x1000)));
    assert_eq!(bp.counter(Addr(0x1000)).value(), 2);
}

#[test]
fn single_not_taken_flips_prediction() {
    let mut bp = bimodal(16);
    bp.update(Addr(0x1000), Addr(0x1100), false);
    assert_eq!(bp.counter(Addr(0x1000)).value(), 1);
    assert!(!bp.predict(Addr(0x1000)));
}

#[test]
fn branches_in_different_slots_are_independent() {
    let mut bp = bimodal(16);
    train(&mut bp, 0x1000, 0x1100, false, 4);
    assert!(!bp.predict(Addr(0x1000)));
    assert!(bp.predict(Addr(0x1004)));
}

#[test]
fn aliasing_branches_share_a_counter() {
    let mut bp = bimodal(16);
    // 16 entries x 4 bytes: 0x1000 and 0x1040 share index 0.
    train(&mut bp, 0x1000, 0x1100, false, 4);
    assert!(!bp.predict(Addr(0x1040)));
}

#[test]
fn wider_counters_need_more_evidence() {
    let mut bp = BimodalPredictor::new(&PredictorConfig {
        entries: 16,
        counter_bits: 3,
        ..config(PredictorKind::Bimodal)
    })
    .unwrap();
    // Starts at 4 of 0..=7.
    bp.update(Addr(0x1000), Addr(0), false);
    assert!(!bp.predict(Addr(0x1000)));
    bp.update(Addr(0x1000), Addr(0), true);
    assert!(bp.predict(Addr(0x1000)));
}

#[test]
fn biased_branch_is_mostly_predicted() {
    let mut bp = bimodal(64);
    let pattern = [true, true, true, true, true, true, true, false];
    let correct = score_pattern(&mut bp, 0x2000, &pattern, 16);
    // Only the not-taken slot of each period misses.
    assert!(correct >= 16 * 7, "got {correct}");
}

#[test]
fn alternating_branch_defeats_bimodal() {
    let mut bp = bimodal(64);
    let correct = score_pattern(&mut bp, 0x2000, &[true, false], 32);
    assert!(correct <= 40, "bimodal should not learn alternation, got {correct}");
}
