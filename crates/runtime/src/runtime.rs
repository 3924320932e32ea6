//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! loads persisted state at startup and exposes a builder-based API for
//! hosts to embed the simulation.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use rad_core::{ActorOracle, ExposureConfig, ExposureRules, ExposureState, SourceRegistry};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::clock::{Clock, SystemClock};
use crate::events::{Event, EventBus, Topic};
use crate::repository::{InMemoryStateRepo, StateRepository};
use crate::workers::{Command, SimulationWorker, WorkerServices};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub exposure: ExposureConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Run exposure checks on a timer (default: true). When disabled, ticks
    /// happen only through [`RuntimeHandle::tick`].
    pub periodic_ticks: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            exposure: ExposureConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            periodic_ticks: true,
        }
    }
}

/// Main runtime that runs the exposure simulation
///
/// Design: Runtime owns the worker task.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Stop the periodic tick, save state and wait for the worker to exit.
    pub async fn shutdown(self) -> Result<()> {
        let requested = self.handle.shutdown().await;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("Runtime shut down");
        requested
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn StateRepository>>,
    actors: Option<Arc<dyn ActorOracle>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            actors: None,
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the simulation settings
    pub fn exposure_config(mut self, exposure: ExposureConfig) -> Self {
        self.config.exposure = exposure;
        self
    }

    /// Enable or disable the periodic tick
    pub fn periodic_ticks(mut self, enabled: bool) -> Self {
        self.config.periodic_ticks = enabled;
        self
    }

    /// Set where state is loaded from and saved to (default: in memory)
    pub fn repository(mut self, repository: impl StateRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set required actor oracle
    pub fn actors(mut self, actors: impl ActorOracle + 'static) -> Self {
        self.actors = Some(Arc::new(actors));
        self
    }

    /// Set the time source (default: system clock)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the runtime
    ///
    /// Persisted state is loaded before the worker starts. A load failure is
    /// logged and the runtime starts empty rather than failing.
    pub async fn build(self) -> Result<Runtime> {
        let actors = self.actors.ok_or(RuntimeError::MissingActorOracle)?;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryStateRepo::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let mut exposure = self.config.exposure;
        for problem in exposure.sanitize() {
            warn!("{problem}");
        }

        let registry = match repository.load_sources() {
            Ok(Some(store)) => SourceRegistry::from_store(store),
            Ok(None) => SourceRegistry::new(),
            Err(e) => {
                error!(error = %e, "Failed to load radiation sources; starting empty");
                SourceRegistry::new()
            }
        };
        info!("Loaded {} radiation sources", registry.len());

        let mut state = ExposureState::new(ExposureRules::from_config(&exposure));
        match repository.load_exposures() {
            Ok(entries) => {
                info!("Loaded {} exposure records", entries.len());
                state.restore(entries, clock.now());
            }
            Err(e) => error!(error = %e, "Failed to load exposure records; starting empty"),
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            exposure,
            registry,
            state,
            WorkerServices {
                repository,
                actors,
                clock,
            },
            command_rx,
            event_bus,
            self.config.periodic_ticks,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
