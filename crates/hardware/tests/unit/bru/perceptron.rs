//! Perceptron Predictor Tests.
//!
//! Verifies the threshold formula, the sign-based prediction, the training
//! rule (mispredicted or low confidence), weight saturation, and row
//! selection for the plain and hashed variants.

use bpsim_core::bru::DirectionPredictor;
use bpsim_core::bru::perceptron::{PerceptronPredictor, sum_bits, training_threshold};
use bpsim_core::common::Addr;
use bpsim_core::config::{PredictorConfig, PredictorKind};
use rstest::rstest;

use crate::common::{config, score_pattern, train, train_pattern};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

fn perceptron(history_length: usize, weight_bits: u32, use_hashing: bool) -> PerceptronPredictor {
    PerceptronPredictor::new(&PredictorConfig {
        entries: 64,
        history_length,
        weight_bits,
        use_hashing,
        ..config(PredictorKind::Perceptron)
    })
    .unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Parameters
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1, 16)]
#[case(8, 29)]
#[case(20, 53)]
#[case(64, 138)]
fn threshold_formula(#[case] history_length: usize, #[case] theta: i32) {
    assert_eq!(training_threshold(history_length), theta);
}

#[rstest]
#[case(20, 8, 13)]
#[case(8, 8, 12)]
#[case(64, 16, 23)]
fn sum_width(#[case] history_length: usize, #[case] weight_bits: u32, #[case] bits: u32) {
    assert_eq!(sum_bits(history_length, weight_bits), bits);
}

#[test]
fn predictor_carries_threshold() {
    assert_eq!(perceptron(20, 8, false).threshold(), 53);
}

#[test]
fn names_follow_hashing() {
    assert_eq!(perceptron(8, 8, false).name(), "perceptron");
    assert_eq!(perceptron(8, 8, true).name(), "perceptron-hashed");
}

// ══════════════════════════════════════════════════════════
// 2. Prediction and training
// ══════════════════════════════════════════════════════════

#[test]
fn zero_weights_predict_taken() {
    let bp = perceptron(20, 8, false);
    assert_eq!(bp.output(Addr(0x1000)), 0);
    assert!(bp.predict(Addr(0x1000)));
}

#[test]
fn first_misprediction_trains_every_weight() {
    let mut bp = perceptron(4, 8, false);
    bp.update(Addr(0x1000), Addr(0x1100), false);
    let row = bp.entry(Addr(0x1000));
    assert_eq!(row.bias.value(), -1);
    // History was all not-taken, agreeing with the outcome.
    assert!(row.weights.iter().all(|w| w.value() == 1));
    assert_eq!(bp.output(Addr(0x1000)), -5);
}

#[test]
fn repeated_not_taken_stops_training_once_confident() {
    let mut bp = perceptron(20, 8, false);
    train(&mut bp, 0x1000, 0x1100, false, 200);
    // Sums after each step: 0, -21, -42, then -63 exceeds theta = 53.
    let row = bp.entry(Addr(0x1000));
    assert_eq!(row.bias.value(), -3);
    assert!(row.weights.iter().all(|w| w.value() == 3));
    assert!(!bp.predict(Addr(0x1000)));
}

#[test]
fn bias_saturates_when_threshold_outruns_weight_range() {
    // 4-bit weights cap |sum| at 15 while theta is 16, so training never stops.
    let mut bp = perceptron(1, 4, false);
    train(&mut bp, 0x1000, 0x1100, false, 200);
    let row = bp.entry(Addr(0x1000));
    assert_eq!(row.bias.value(), -8);
    assert_eq!(row.weights[0].value(), 7);
}

#[test]
fn rows_for_other_branches_are_untouched() {
    let mut bp = perceptron(8, 8, false);
    train(&mut bp, 0x1000, 0x1100, false, 5);
    assert_eq!(bp.entry(Addr(0x1004)).bias.value(), 0);
}

#[test]
fn learns_alternating_branch() {
    let mut bp = perceptron(8, 8, false);
    let pattern = [true, false];
    train_pattern(&mut bp, 0x2000, &pattern, 20);
    assert_eq!(score_pattern(&mut bp, 0x2000, &pattern, 16), 32);
}

#[test]
fn history_advances_on_every_update() {
    let mut bp = perceptron(8, 8, false);
    bp.update(Addr(0x1000), Addr(0x1100), true);
    bp.update(Addr(0x2000), Addr(0x2100), false);
    bp.update(Addr(0x3000), Addr(0x3100), true);
    assert_eq!(bp.history().value(), 0b101);
}

// ══════════════════════════════════════════════════════════
// 3. Row selection
// ══════════════════════════════════════════════════════════

#[test]
fn plain_row_ignores_history() {
    let mut bp = perceptron(8, 8, false);
    let before = bp.index(Addr(0x1000));
    train(&mut bp, 0x2000, 0x2100, true, 3);
    assert_eq!(bp.index(Addr(0x1000)), before);
}

#[test]
fn hashed_row_moves_with_history() {
    let mut bp = perceptron(8, 8, true);
    let before = bp.index(Addr(0x1000));
    bp.update(Addr(0x2000), Addr(0x2100), true);
    assert_eq!(bp.index(Addr(0x1000)), before ^ 1);
}
