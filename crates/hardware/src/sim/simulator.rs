//! Simulator: replays a branch trace through one prediction unit.
//!
//! Each record is one clock tick. The prediction for the record's address is
//! made against the state at the start of the tick, then the resolved outcome
//! is committed, then the prediction is scored.

use tracing::info;

use crate::bru::{BranchPredictionUnit, Prediction};
use crate::common::ConfigError;
use crate::config::PredictorConfig;
use crate::sim::trace::BranchRecord;
use crate::stats::BranchStats;

/// Top-level simulator: a prediction unit plus the statistics it has earned.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// The unit under test.
    pub unit: BranchPredictionUnit,
    /// Statistics accumulated so far.
    pub stats: BranchStats,
}

impl Simulator {
    /// Creates a simulator around a freshly built unit.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised while building the unit.
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            unit: BranchPredictionUnit::new(config)?,
            stats: BranchStats::default(),
        })
    }

    /// Advances the simulator by one tick for a single resolved branch.
    ///
    /// Returns the prediction that was made for it.
    pub fn step(&mut self, record: &BranchRecord) -> Prediction {
        let prediction = self
            .unit
            .tick(Some(record.pc), Some(record.as_update()))
            .unwrap_or_else(|| Prediction::fall_through(record.pc));
        self.stats.record(prediction, record);
        prediction
    }

    /// Steps through every record and returns the statistics for this run only.
    pub fn run<'a, I>(&mut self, trace: I) -> BranchStats
    where
        I: IntoIterator<Item = &'a BranchRecord>,
    {
        let before = self.stats;
        for record in trace {
            let _ = self.step(record);
        }
        let run = BranchStats {
            branches: self.stats.branches - before.branches,
            taken_branches: self.stats.taken_branches - before.taken_branches,
            direction_mispredictions: self.stats.direction_mispredictions
                - before.direction_mispredictions,
            target_mispredictions: self.stats.target_mispredictions - before.target_mispredictions,
        };
        info!(
            predictor = self.unit.label(),
            branches = run.branches,
            mispredictions = run.mispredictions(),
            rate = format_args!("{:.2}%", run.misprediction_rate()),
            "trace replayed"
        );
        run
    }
}
