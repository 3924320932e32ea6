//! Simulation worker that owns the source registry and exposure state.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs the
//! periodic exposure tick through [`rad_core::ExposureEngine`], and publishes
//! enriched events to the EventBus. Being the only owner of both maps, it
//! needs no locks: commands and ticks are applied strictly one after another.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use rad_core::{
    ActorId, ActorOracle, ActorView, ExposureConfig, ExposureEngine, ExposureEvent, ExposureRules,
    ExposureState, GeneralConfig, Position, RadiationSource, SourceId, SourceRegistry,
    TickSummary, Timestamp,
};

use crate::api::{ConsumeOutcome, HealingItem, ReloadSummary, Result, RuntimeError, SourceUpdate};
use crate::clock::Clock;
use crate::events::{Event, EventBus, EventExtractor, SourceEvent};
use crate::repository::{RepositoryError, StateRepository};

/// Commands that can be sent to the simulation worker
pub enum Command {
    CreateSource {
        name: String,
        position: Position,
        radius: i64,
        strength: i64,
        power: i64,
        reply: oneshot::Sender<Result<RadiationSource>>,
    },
    Source {
        id: SourceId,
        reply: oneshot::Sender<Option<RadiationSource>>,
    },
    SourceByName {
        name: String,
        reply: oneshot::Sender<Option<RadiationSource>>,
    },
    RemoveSource {
        id: SourceId,
        reply: oneshot::Sender<bool>,
    },
    RemoveSourceByName {
        name: String,
        reply: oneshot::Sender<bool>,
    },
    UpdateSource {
        id: SourceId,
        update: SourceUpdate,
        reply: oneshot::Sender<Result<Option<RadiationSource>>>,
    },
    Sources {
        active_only: bool,
        reply: oneshot::Sender<Vec<RadiationSource>>,
    },
    SourcesNear {
        position: Position,
        reply: oneshot::Sender<Vec<RadiationSource>>,
    },
    LevelAt {
        position: Position,
        reply: oneshot::Sender<u32>,
    },
    Exposure {
        actor: ActorId,
        reply: oneshot::Sender<u32>,
    },
    SetExposure {
        actor: ActorId,
        level: i64,
        reply: oneshot::Sender<u32>,
    },
    AddExposure {
        actor: ActorId,
        amount: u32,
        reply: oneshot::Sender<Result<u32>>,
    },
    SubtractExposure {
        actor: ActorId,
        amount: u32,
        reply: oneshot::Sender<u32>,
    },
    ResetExposure {
        reply: oneshot::Sender<()>,
    },
    Resistance {
        actor: ActorId,
        reply: oneshot::Sender<Result<f64>>,
    },
    ApplyTimedBuff {
        actor: ActorId,
        duration_seconds: u64,
        reply: oneshot::Sender<Timestamp>,
    },
    HasActiveBuff {
        actor: ActorId,
        reply: oneshot::Sender<bool>,
    },
    Release {
        actor: ActorId,
        reply: oneshot::Sender<bool>,
    },
    Refresh {
        actor: ActorId,
        reply: oneshot::Sender<u32>,
    },
    Consume {
        actor: ActorId,
        item: HealingItem,
        reply: oneshot::Sender<ConsumeOutcome>,
    },
    /// Run one exposure check immediately.
    Tick {
        reply: oneshot::Sender<TickSummary>,
    },
    Save {
        reply: oneshot::Sender<Result<()>>,
    },
    Reload {
        config: Box<ExposureConfig>,
        reply: oneshot::Sender<Result<ReloadSummary>>,
    },
    /// Save state and stop the worker loop.
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Host-provided collaborators the worker reads from or writes to.
#[derive(Clone)]
pub struct WorkerServices {
    pub repository: Arc<dyn StateRepository>,
    pub actors: Arc<dyn ActorOracle>,
    pub clock: Arc<dyn Clock>,
}

/// Background task that processes simulation commands and periodic ticks.
pub struct SimulationWorker {
    config: ExposureConfig,
    registry: SourceRegistry,
    state: ExposureState,
    engine: ExposureEngine,
    extractor: EventExtractor,
    services: WorkerServices,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    periodic_ticks: bool,
    interval: Option<Interval>,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    ///
    /// `config` must already be sanitized.
    pub fn new(
        config: ExposureConfig,
        registry: SourceRegistry,
        state: ExposureState,
        services: WorkerServices,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        periodic_ticks: bool,
    ) -> Self {
        info!(
            "SimulationWorker initialized with {} sources, {} exposed actors",
            registry.len(),
            state.exposed_actors().count()
        );

        Self {
            engine: ExposureEngine::new(&config),
            extractor: EventExtractor::new(&config),
            interval: None,
            config,
            registry,
            state,
            services,
            command_rx,
            event_bus,
            periodic_ticks,
        }
    }

    /// Main worker loop.
    ///
    /// Ends on [`Command::Shutdown`] or when every handle has been dropped;
    /// state is saved either way.
    pub async fn run(mut self) {
        self.interval = self
            .periodic_ticks
            .then(|| check_interval(&self.config.general));

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        let _ = self.save();
                        break;
                    };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                _ = next_tick(&mut self.interval) => {
                    self.run_tick();
                }
            }
        }

        info!("SimulationWorker stopped");
    }

    /// Returns `false` once the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::CreateSource {
                name,
                position,
                radius,
                strength,
                power,
                reply,
            } => {
                let result = self.create_source(name, position, radius, strength, power);
                self.respond(reply, result, "CreateSource");
            }
            Command::Source { id, reply } => {
                let source = self.registry.by_id(id).cloned();
                self.respond(reply, source, "Source");
            }
            Command::SourceByName { name, reply } => {
                let source = self.registry.by_name(&name).cloned();
                self.respond(reply, source, "SourceByName");
            }
            Command::RemoveSource { id, reply } => {
                let removed = self.remove_source(id);
                self.respond(reply, removed, "RemoveSource");
            }
            Command::RemoveSourceByName { name, reply } => {
                let removed = match self.registry.by_name(&name).map(RadiationSource::id) {
                    Some(id) => self.remove_source(id),
                    None => false,
                };
                self.respond(reply, removed, "RemoveSourceByName");
            }
            Command::UpdateSource { id, update, reply } => {
                let result = self.update_source(id, update);
                self.respond(reply, result, "UpdateSource");
            }
            Command::Sources { active_only, reply } => {
                let sources = if active_only {
                    self.registry.active().cloned().collect()
                } else {
                    self.registry.all().cloned().collect()
                };
                self.respond(reply, sources, "Sources");
            }
            Command::SourcesNear { position, reply } => {
                let sources = self
                    .registry
                    .near_position(&position)
                    .into_iter()
                    .cloned()
                    .collect();
                self.respond(reply, sources, "SourcesNear");
            }
            Command::LevelAt { position, reply } => {
                let level = self.registry.level_at(&position);
                self.respond(reply, level, "LevelAt");
            }
            Command::Exposure { actor, reply } => {
                let level = self.state.get(actor);
                self.respond(reply, level, "Exposure");
            }
            Command::SetExposure {
                actor,
                level,
                reply,
            } => {
                self.state.set(actor, level);
                let level = self.state.get(actor);
                self.respond(reply, level, "SetExposure");
            }
            Command::AddExposure {
                actor,
                amount,
                reply,
            } => {
                let result = self.online_actor(actor).map(|view| {
                    self.state.add(&view, amount, self.services.clock.now());
                    self.state.get(actor)
                });
                self.respond(reply, result, "AddExposure");
            }
            Command::SubtractExposure {
                actor,
                amount,
                reply,
            } => {
                self.state.subtract(actor, amount);
                let level = self.state.get(actor);
                self.respond(reply, level, "SubtractExposure");
            }
            Command::ResetExposure { reply } => {
                self.state.reset();
                info!("Exposure state reset");
                self.respond(reply, (), "ResetExposure");
            }
            Command::Resistance { actor, reply } => {
                let result = self
                    .online_actor(actor)
                    .map(|view| self.state.resistance(&view, self.services.clock.now()));
                self.respond(reply, result, "Resistance");
            }
            Command::ApplyTimedBuff {
                actor,
                duration_seconds,
                reply,
            } => {
                let expiry =
                    self.state
                        .apply_timed_buff(actor, duration_seconds, self.services.clock.now());
                self.respond(reply, expiry, "ApplyTimedBuff");
            }
            Command::HasActiveBuff { actor, reply } => {
                let active = self
                    .state
                    .has_active_buff(actor, self.services.clock.now());
                self.respond(reply, active, "HasActiveBuff");
            }
            Command::Release { actor, reply } => {
                let released = self.state.release(actor);
                self.respond(reply, released, "Release");
            }
            Command::Refresh { actor, reply } => {
                let level = self.state.refresh(actor);
                self.respond(reply, level, "Refresh");
            }
            Command::Consume { actor, item, reply } => {
                let outcome = self.consume(actor, item);
                self.respond(reply, outcome, "Consume");
            }
            Command::Tick { reply } => {
                let summary = self.run_tick();
                self.respond(reply, summary, "Tick");
            }
            Command::Save { reply } => {
                let result = self.save();
                self.respond(reply, result, "Save");
            }
            Command::Reload { config, reply } => {
                let result = self.reload(*config);
                self.respond(reply, result, "Reload");
            }
            Command::Shutdown { reply } => {
                let _ = self.save();
                self.respond(reply, (), "Shutdown");
                return false;
            }
        }

        true
    }

    fn online_actor(&self, actor: ActorId) -> Result<ActorView> {
        self.services
            .actors
            .actor(actor)
            .ok_or(RuntimeError::UnknownActor(actor))
    }

    fn create_source(
        &mut self,
        name: String,
        position: Position,
        radius: i64,
        strength: i64,
        power: i64,
    ) -> Result<RadiationSource> {
        if self.registry.by_name(&name).is_some() {
            return Err(RuntimeError::DuplicateSourceName(name));
        }

        let source = self
            .registry
            .create(name, position, radius, strength, power)
            .clone();
        self.log_registry("Created", &source);
        self.event_bus
            .publish(Event::Sources(SourceEvent::Created(source.clone())));

        Ok(source)
    }

    fn update_source(
        &mut self,
        id: SourceId,
        update: SourceUpdate,
    ) -> Result<Option<RadiationSource>> {
        if let Some(name) = &update.name
            && self
                .registry
                .by_name(name)
                .is_some_and(|existing| existing.id() != id)
        {
            return Err(RuntimeError::DuplicateSourceName(name.clone()));
        }

        let Some(source) = self
            .registry
            .update(id, |source| update.apply(source))
            .cloned()
        else {
            return Ok(None);
        };

        self.log_registry("Updated", &source);
        self.event_bus
            .publish(Event::Sources(SourceEvent::Updated(source.clone())));

        Ok(Some(source))
    }

    fn remove_source(&mut self, id: SourceId) -> bool {
        let Some(source) = self.registry.by_id(id).cloned() else {
            return false;
        };

        self.registry.remove(id);
        self.log_registry("Removed", &source);
        self.event_bus.publish(Event::Sources(SourceEvent::Removed {
            id,
            name: source.name().to_string(),
        }));

        true
    }

    fn log_registry(&self, action: &str, source: &RadiationSource) {
        if self.config.general.debug {
            info!(
                id = source.id().0,
                name = source.name(),
                world = source.position().world.as_str(),
                radius = source.radius(),
                strength = source.strength(),
                power = source.power(),
                "{action} radiation source"
            );
        } else {
            debug!(id = source.id().0, name = source.name(), "{action} radiation source");
        }
    }

    fn consume(&mut self, actor: ActorId, item: HealingItem) -> ConsumeOutcome {
        let outcome = match item {
            HealingItem::RadAway => {
                let before = self.state.get(actor);
                self.state
                    .subtract(actor, self.config.healing.rad_away.amount);
                let level = self.state.get(actor);
                ConsumeOutcome::Cleansed {
                    removed: before - level,
                    level,
                }
            }
            HealingItem::RadX => {
                let expiry = self.state.apply_timed_buff(
                    actor,
                    self.config.healing.rad_x.duration_seconds,
                    self.services.clock.now(),
                );
                ConsumeOutcome::Shielded { expiry }
            }
        };

        debug!(actor = actor.0, %item, ?outcome, "Healing item consumed");
        outcome
    }

    fn run_tick(&mut self) -> TickSummary {
        let now = self.services.clock.now();
        let (events, summary) = self.engine.tick(
            &self.registry,
            &mut self.state,
            self.services.actors.as_ref(),
            now,
        );
        self.publish(events);

        trace!(
            exposed = summary.exposed,
            decayed = summary.decayed,
            skipped = summary.skipped,
            damaged = summary.damaged,
            "Exposure tick"
        );

        summary
    }

    /// Publishes what the command queued, then replies, so a caller that
    /// subscribes after the reply never sees the command's own events.
    fn respond<T>(&mut self, reply: oneshot::Sender<T>, value: T, command: &str) {
        self.flush_events();
        if reply.send(value).is_err() {
            debug!("{command} reply channel closed (caller dropped)");
        }
    }

    fn flush_events(&mut self) {
        let events = self.state.drain_events();
        self.publish(events);
    }

    fn publish(&mut self, events: Vec<ExposureEvent>) {
        for event in events {
            if let Some(event) = self.extractor.extract(event) {
                self.event_bus.publish(event);
            }
        }
    }

    fn persist(&self) -> std::result::Result<(usize, usize), RepositoryError> {
        let store = self.registry.to_store();
        let entries = self.state.export(self.services.clock.now());

        self.services.repository.save_sources(&store)?;
        self.services.repository.save_exposures(&entries)?;

        Ok((store.sources.len(), entries.len()))
    }

    /// Writes state out. Failures are logged and the in-memory state is kept.
    fn save(&self) -> Result<()> {
        match self.persist() {
            Ok((sources, records)) => {
                info!("Saved {} sources and {} exposure records", sources, records);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to save simulation state");
                Err(e.into())
            }
        }
    }

    /// Saves, applies `config`, then re-reads persisted state.
    ///
    /// If the save fails the new configuration still applies but the
    /// in-memory registry and exposure levels are kept as they are.
    fn reload(&mut self, config: ExposureConfig) -> Result<ReloadSummary> {
        let saved = self.save();
        self.apply_config(config);
        saved?;

        let now = self.services.clock.now();
        let repository = Arc::clone(&self.services.repository);

        let store = repository.load_sources().inspect_err(|e| {
            error!(error = %e, "Failed to reload sources; keeping current registry");
        })?;
        let entries = repository.load_exposures().inspect_err(|e| {
            error!(error = %e, "Failed to reload exposure records; keeping current levels");
        })?;

        self.registry = store
            .map(SourceRegistry::from_store)
            .unwrap_or_else(SourceRegistry::new);
        self.state.restore(entries, now);
        for actor in self.services.actors.online_actors() {
            self.state.refresh(actor);
        }

        let count = self.registry.len();
        if self.config.general.debug {
            info!("Reloaded {} radiation sources", count);
        } else {
            debug!("Reloaded {} radiation sources", count);
        }
        self.event_bus
            .publish(Event::Sources(SourceEvent::Reloaded { count }));

        Ok(ReloadSummary { sources: count })
    }

    fn apply_config(&mut self, mut config: ExposureConfig) {
        for problem in config.sanitize() {
            warn!("{problem}");
        }

        self.engine.reconfigure(&config);
        self.state.set_rules(ExposureRules::from_config(&config));
        self.extractor = EventExtractor::new(&config);
        self.interval = self
            .periodic_ticks
            .then(|| check_interval(&config.general));
        self.config = config;

        info!("Configuration applied");
    }
}

/// Interval for the periodic exposure check. The first tick fires one full
/// period after creation; missed ticks are skipped rather than bunched.
fn check_interval(general: &GeneralConfig) -> Interval {
    let period = Duration::from_millis(general.check_period_millis().max(1));
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
