//! Runtime orchestration for the radiation exposure simulation.
//!
//! This crate wraps the pure rules in `rad-core` with a single-owner worker
//! task, a periodic tick, persistence and a topic-based event bus. Consumers
//! embed [`Runtime`] and talk to it through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps background tasks internal to the crate
//! - [`oracle`], [`clock`] and [`repository`] provide adapters to the host
pub mod api;
pub mod clock;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    ConsumeOutcome, HealingItem, ReloadSummary, Result, RuntimeError, RuntimeHandle,
    SourceUpdate,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{
    EffectEvent, Event, EventBus, EventExtractor, IndicatorUpdate, IndicatorView, LevelEvent,
    SourceEvent, Topic,
};
pub use oracle::RosterOracle;
pub use repository::{
    FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository, StorageFormat,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
