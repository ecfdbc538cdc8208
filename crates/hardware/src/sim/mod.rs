//! Trace-driven simulation.
//!
//! Provides synthetic branch workloads, file loading for configurations and
//! traces, and the simulator that replays a trace one tick at a time.

pub mod loader;
pub mod simulator;
pub mod trace;

pub use simulator::Simulator;
pub use trace::{BranchRecord, Workload};
