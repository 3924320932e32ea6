//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of the source registry and the
//! exposure state; everything else reaches them through [`Command`]s.

mod simulation;

pub use simulation::{Command, SimulationWorker, WorkerServices};
