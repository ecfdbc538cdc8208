//! Branch Prediction Unit Tests.
//!
//! Verifies how direction and target are combined, the tick ordering, error
//! reporting at construction, that independent units share nothing, and that
//! replaying the same stream always yields the same predictions.

use std::thread;

use bpsim_core::bru::{BranchPredictionUnit, DirectionPredictor, Prediction, UpdateRequest};
use bpsim_core::common::{Addr, ConfigError};
use bpsim_core::config::{PredictorConfig, PredictorKind, TargetCacheKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::config;

fn unit(config: &PredictorConfig) -> BranchPredictionUnit {
    BranchPredictionUnit::new(config).expect("valid configuration")
}

fn request(pc: u32, target: u32, taken: bool) -> UpdateRequest {
    UpdateRequest {
        address: Addr(pc),
        target: Addr(target),
        taken,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn every_preset_builds() {
    for name in PredictorConfig::PRESETS {
        let cfg = PredictorConfig::preset(name).expect("preset exists");
        let bpu = unit(&cfg);
        assert_eq!(bpu.label(), cfg.label());
    }
}

#[test]
fn btb_kind_has_no_direction_predictor() {
    let bpu = unit(&PredictorConfig::preset("btb").expect("preset exists"));
    assert!(bpu.direction().is_none());
}

#[test]
fn direction_predictor_matches_label() {
    let bpu = unit(&PredictorConfig::preset("per-b").expect("preset exists"));
    assert_eq!(bpu.direction().map(DirectionPredictor::name), Some("perceptron-hashed"));
}

#[test]
fn invalid_configuration_is_rejected() {
    let cfg = PredictorConfig {
        entries: 1000,
        ..PredictorConfig::default()
    };
    let err = BranchPredictionUnit::new(&cfg).err();
    assert_eq!(
        err,
        Some(ConfigError::NotPowerOfTwo {
            field: "entries",
            value: 1000
        })
    );
}

// ══════════════════════════════════════════════════════════
// 2. Combining direction and target
// ══════════════════════════════════════════════════════════

#[test]
fn taken_without_cached_target_falls_back_to_next_instruction() {
    let bpu = unit(&config(PredictorKind::Bimodal));
    assert_eq!(
        bpu.predict(Addr(0x1000)),
        Prediction {
            taken: true,
            predicted_address: Addr(0x1004),
        }
    );
}

#[test]
fn taken_with_cached_target_redirects() {
    let mut bpu = unit(&config(PredictorKind::Bimodal));
    bpu.update(Addr(0x1000), Addr(0x1800), true);
    assert_eq!(
        bpu.predict(Addr(0x1000)),
        Prediction {
            taken: true,
            predicted_address: Addr(0x1800),
        }
    );
}

#[test]
fn not_taken_ignores_cached_target() {
    let mut bpu = unit(&config(PredictorKind::Bimodal));
    bpu.update(Addr(0x1000), Addr(0x1800), true);
    for _ in 0..3 {
        bpu.update(Addr(0x1000), Addr(0x1800), false);
    }
    assert_eq!(bpu.predict(Addr(0x1000)), Prediction::fall_through(Addr(0x1000)));
}

#[test]
fn counter_btb_alone_decides_direction() {
    let mut bpu = unit(&PredictorConfig::preset("btb").expect("preset exists"));
    assert_eq!(bpu.predict(Addr(0x2000)), Prediction::fall_through(Addr(0x2000)));
    bpu.update(Addr(0x2000), Addr(0x3000), true);
    assert_eq!(
        bpu.predict(Addr(0x2000)),
        Prediction {
            taken: true,
            predicted_address: Addr(0x3000),
        }
    );
}

#[test]
fn gshare_btb_uses_private_target_store() {
    let cfg = PredictorConfig {
        target_cache: TargetCacheKind::CounterIntegrated,
        ..config(PredictorKind::GShareBtb)
    };
    let mut bpu = unit(&cfg);
    assert!(!bpu.predict(Addr(0x2000)).taken, "no target cached yet");
    bpu.update(Addr(0x2000), Addr(0x3000), true);
    assert_eq!(bpu.predict(Addr(0x2000)).predicted_address, Addr(0x3000));
}

// ══════════════════════════════════════════════════════════
// 3. Tick ordering
// ══════════════════════════════════════════════════════════

#[test]
fn same_tick_update_is_not_visible_to_query() {
    let mut bpu = unit(&PredictorConfig::preset("btb").expect("preset exists"));
    let p = bpu.tick(Some(Addr(0x2000)), Some(request(0x2000, 0x3000, true)));
    assert_eq!(p, Some(Prediction::fall_through(Addr(0x2000))));

    let p = bpu.tick(Some(Addr(0x2000)), None);
    assert_eq!(p.map(|p| p.predicted_address), Some(Addr(0x3000)));
}

#[test]
fn idle_tick_changes_nothing() {
    let mut bpu = unit(&config(PredictorKind::Bimodal));
    assert_eq!(bpu.tick(None, None), None);
    assert!(bpu.predict(Addr(0x1000)).taken);
}

#[test]
fn update_only_tick_returns_no_prediction() {
    let mut bpu = unit(&config(PredictorKind::Bimodal));
    assert_eq!(bpu.tick(None, Some(request(0x1000, 0x1100, false))), None);
    assert!(!bpu.predict(Addr(0x1000)).taken);
}

// ══════════════════════════════════════════════════════════
// 4. Independence
// ══════════════════════════════════════════════════════════

#[test]
fn clones_do_not_share_state() {
    let mut a = unit(&config(PredictorKind::Bimodal));
    let b = a.clone();
    a.update(Addr(0x1000), Addr(0x1100), false);
    assert!(!a.predict(Addr(0x1000)).taken);
    assert!(b.predict(Addr(0x1000)).taken);
}

#[test]
fn units_run_concurrently_and_independently() {
    let results: Vec<(bool, Prediction)> = thread::scope(|s| {
        let handles: Vec<_> = [true, false, true, false]
            .into_iter()
            .map(|taken| {
                s.spawn(move || {
                    let mut bpu = unit(&config(PredictorKind::GShare));
                    for _ in 0..64 {
                        bpu.update(Addr(0x1000), Addr(0x2000), taken);
                    }
                    (taken, bpu.predict(Addr(0x1000)))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread panicked"))
            .collect()
    });

    for (taken, prediction) in results {
        assert_eq!(prediction.taken, taken);
    }
}

// ══════════════════════════════════════════════════════════
// 5. Determinism
// ══════════════════════════════════════════════════════════

fn replay(config: &PredictorConfig, stream: &[(u32, u32, bool)]) -> Vec<Option<Prediction>> {
    let mut bpu = unit(config);
    stream
        .iter()
        .map(|&(pc, target, taken)| bpu.tick(Some(Addr(pc)), Some(request(pc, target, taken))))
        .collect()
}

proptest! {
    #[test]
    fn fresh_units_replay_identically(
        stream in prop::collection::vec((0x1000u32..0x1400, any::<u32>(), any::<bool>()), 0..300),
    ) {
        for name in PredictorConfig::PRESETS {
            let cfg = PredictorConfig::preset(name).expect("preset exists");
            let first = replay(&cfg, &stream);
            let second = replay(&cfg, &stream);
            prop_assert_eq!(first, second, "{} diverged", name);
        }
    }
}
