//! Branch Prediction Unit.
//!
//! The only component the front-end talks to. It owns one direction
//! predictor and one target cache and combines them:
//! - direction comes from the direction predictor (or from the counter BTB
//!   when no direction predictor is configured);
//! - the target comes from the predictor's private store if it has one, then
//!   from the target cache, falling back to `pc + 4`.
//!
//! Each clock tick takes at most one query and one update. The query is
//! answered from the state at the start of the tick; the update becomes
//! visible from the next tick on.

use tracing::debug;

use super::btb::TargetCache;
use super::{DirectionPredictor, DirectionPredictorWrapper, Prediction, UpdateRequest};
use crate::common::{Addr, ConfigError};
use crate::config::PredictorConfig;

/// Direction predictor plus target cache.
#[derive(Clone, Debug)]
pub struct BranchPredictionUnit {
    /// `None` when the target cache decides direction itself.
    direction: Option<DirectionPredictorWrapper>,
    /// Shared target cache.
    targets: TargetCache,
    /// Resolved variant name.
    label: &'static str,
}

impl BranchPredictionUnit {
    /// Validates `config` and builds a cold unit.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found; no state is allocated in that case.
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let direction = DirectionPredictorWrapper::new(config)?;
        let targets = TargetCache::new(config)?;
        debug!(
            variant = config.label(),
            entries = config.entries,
            history_length = config.history_length,
            btb_entries = config.btb_entries,
            target_cache = ?config.target_cache,
            "branch prediction unit built"
        );

        Ok(Self {
            direction,
            targets,
            label: config.label(),
        })
    }

    /// Resolved variant name, e.g. `perceptron-hashed`.
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// The direction predictor, if one is configured.
    pub const fn direction(&self) -> Option<&DirectionPredictorWrapper> {
        self.direction.as_ref()
    }

    /// The target cache.
    pub const fn target_cache(&self) -> &TargetCache {
        &self.targets
    }

    /// Predicts direction and next address for the branch at `pc`.
    ///
    /// Reads current state only.
    pub fn predict(&self, pc: Addr) -> Prediction {
        let Some(direction) = &self.direction else {
            return self.targets.predict(pc);
        };
        if !direction.predict(pc) {
            return Prediction::fall_through(pc);
        }
        let target = direction
            .predict_target(pc)
            .or_else(|| self.targets.lookup(pc))
            .unwrap_or_else(|| pc.next_sequential());
        Prediction {
            taken: true,
            predicted_address: target,
        }
    }

    /// Forwards a resolved branch to both components.
    pub fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        if let Some(direction) = &mut self.direction {
            direction.update(pc, target, taken);
        }
        self.targets.update(pc, target, taken);
    }

    /// Runs one clock tick.
    ///
    /// The prediction for `query` is computed before `update` is applied, so
    /// an update in the same tick never influences that tick's prediction.
    pub fn tick(&mut self, query: Option<Addr>, update: Option<UpdateRequest>) -> Option<Prediction> {
        let prediction = query.map(|pc| self.predict(pc));
        if let Some(req) = update {
            self.update(req.address, req.target, req.taken);
        }
        prediction
    }
}
