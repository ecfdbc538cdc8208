//! # Statistics Tests
//!
//! Verifies that `BranchStats` classifies each resolved branch correctly and
//! that derived metrics and the report are consistent with the counts.

use bpsim_core::Prediction;
use bpsim_core::common::Addr;
use bpsim_core::sim::BranchRecord;
use bpsim_core::stats::BranchStats;
use pretty_assertions::assert_eq;

fn taken_to(target: u32) -> Prediction {
    Prediction {
        taken: true,
        predicted_address: Addr(target),
    }
}

#[test]
fn empty_stats() {
    let stats = BranchStats::default();
    assert_eq!(stats.branches, 0);
    assert!(stats.misprediction_rate().abs() < f64::EPSILON);
    assert!((stats.accuracy() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn correct_taken_prediction() {
    let mut stats = BranchStats::default();
    stats.record(taken_to(0x2000), &BranchRecord::new(0x1000, 0x2000, true));
    assert_eq!(
        stats,
        BranchStats {
            branches: 1,
            taken_branches: 1,
            direction_mispredictions: 0,
            target_mispredictions: 0,
        }
    );
}

#[test]
fn wrong_direction_counts_once() {
    let mut stats = BranchStats::default();
    stats.record(taken_to(0x2000), &BranchRecord::new(0x1000, 0x2000, false));
    stats.record(
        Prediction::fall_through(Addr(0x1000)),
        &BranchRecord::new(0x1000, 0x2000, true),
    );
    assert_eq!(stats.direction_mispredictions, 2);
    assert_eq!(stats.target_mispredictions, 0);
    assert_eq!(stats.mispredictions(), 2);
}

#[test]
fn wrong_target_on_taken_branch() {
    let mut stats = BranchStats::default();
    stats.record(taken_to(0x1004), &BranchRecord::new(0x1000, 0x2000, true));
    assert_eq!(stats.direction_mispredictions, 0);
    assert_eq!(stats.target_mispredictions, 1);
}

#[test]
fn correct_not_taken_ignores_target() {
    let mut stats = BranchStats::default();
    stats.record(
        Prediction::fall_through(Addr(0x1000)),
        &BranchRecord::new(0x1000, 0x2000, false),
    );
    assert_eq!(stats.mispredictions(), 0);
}

#[test]
fn rate_is_percent_of_branches() {
    let stats = BranchStats {
        branches: 200,
        taken_branches: 150,
        direction_mispredictions: 30,
        target_mispredictions: 10,
    };
    assert!((stats.misprediction_rate() - 20.0).abs() < 1e-9);
    assert!((stats.accuracy() - 0.8).abs() < 1e-9);
}

#[test]
fn merge_adds_counts() {
    let mut a = BranchStats {
        branches: 10,
        taken_branches: 5,
        direction_mispredictions: 2,
        target_mispredictions: 1,
    };
    let b = BranchStats {
        branches: 4,
        taken_branches: 4,
        direction_mispredictions: 0,
        target_mispredictions: 3,
    };
    a.merge(&b);
    assert_eq!(
        a,
        BranchStats {
            branches: 14,
            taken_branches: 9,
            direction_mispredictions: 2,
            target_mispredictions: 4,
        }
    );
}

#[test]
fn report_has_stable_lines() {
    let stats = BranchStats {
        branches: 1000,
        taken_branches: 600,
        direction_mispredictions: 50,
        target_mispredictions: 25,
    };
    let report = stats.report("correlated");
    assert!(report.contains("BRANCH PREDICTION: correlated"));
    assert!(report.contains("Total branches: 1000\n"));
    assert!(report.contains("Taken branches: 600 (60.00%)"));
    assert!(report.contains("Misprediction rate: 7.50%\n"));
    assert!(report.contains("Accuracy: 92.50%"));
}

#[test]
fn stats_serialize_as_plain_counts() {
    let stats = BranchStats {
        branches: 3,
        taken_branches: 2,
        direction_mispredictions: 1,
        target_mispredictions: 0,
    };
    let value = serde_json::to_value(stats).unwrap();
    assert_eq!(value["branches"], 3);
    assert_eq!(value["direction_mispredictions"], 1);
}
