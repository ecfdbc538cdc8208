//! Branch prediction statistics collection and reporting.
//!
//! This module tracks prediction quality for one simulated run. It provides:
//! 1. **Counts:** Branches, taken branches, direction and target mispredictions.
//! 2. **Derived metrics:** Misprediction rate and accuracy.
//! 3. **Reporting:** A plain-text report whose `Total branches:` and
//!    `Misprediction rate:` lines are stable for scripts to parse.

use serde::{Deserialize, Serialize};

use crate::bru::Prediction;
use crate::sim::trace::BranchRecord;

/// Branch prediction statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchStats {
    /// Resolved branches observed.
    pub branches: u64,
    /// Resolved branches that were taken.
    pub taken_branches: u64,
    /// Branches whose predicted direction was wrong.
    pub direction_mispredictions: u64,
    /// Taken branches predicted taken, but to the wrong address.
    pub target_mispredictions: u64,
}

impl BranchStats {
    /// Classifies one resolved branch against the prediction made for it.
    pub fn record(&mut self, prediction: Prediction, actual: &BranchRecord) {
        self.branches += 1;
        if actual.taken {
            self.taken_branches += 1;
        }
        if prediction.taken != actual.taken {
            self.direction_mispredictions += 1;
        } else if actual.taken && prediction.predicted_address != actual.target {
            self.target_mispredictions += 1;
        }
    }

    /// Total mispredictions (direction or target).
    pub const fn mispredictions(&self) -> u64 {
        self.direction_mispredictions + self.target_mispredictions
    }

    /// Misprediction rate in percent; 0 when no branch was seen.
    pub fn misprediction_rate(&self) -> f64 {
        if self.branches == 0 {
            0.0
        } else {
            self.mispredictions() as f64 / self.branches as f64 * 100.0
        }
    }

    /// Fraction of branches predicted correctly, in `[0, 1]`; 1 when no branch was seen.
    pub fn accuracy(&self) -> f64 {
        1.0 - self.misprediction_rate() / 100.0
    }

    /// Adds another run's counts to this one.
    pub const fn merge(&mut self, other: &Self) {
        self.branches += other.branches;
        self.taken_branches += other.taken_branches;
        self.direction_mispredictions += other.direction_mispredictions;
        self.target_mispredictions += other.target_mispredictions;
    }

    /// Renders the report printed by [`BranchStats::print`].
    pub fn report(&self, title: &str) -> String {
        let taken_pct = if self.branches == 0 {
            0.0
        } else {
            self.taken_branches as f64 / self.branches as f64 * 100.0
        };
        format!(
            "==========================================================\n\
             BRANCH PREDICTION: {title}\n\
             ----------------------------------------------------------\n\
             Total branches: {}\n\
             Taken branches: {} ({taken_pct:.2}%)\n\
             Direction mispredictions: {}\n\
             Target mispredictions: {}\n\
             Misprediction rate: {:.2}%\n\
             Accuracy: {:.2}%\n\
             ==========================================================",
            self.branches,
            self.taken_branches,
            self.direction_mispredictions,
            self.target_mispredictions,
            self.misprediction_rate(),
            self.accuracy() * 100.0,
        )
    }

    /// Prints the report to stdout.
    pub fn print(&self, title: &str) {
        println!("{}", self.report(title));
    }
}
