//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! managing sources, adjusting exposure, stepping the simulation or
//! streaming events from specific topics. Every call is a round trip to the
//! simulation worker, so calls from one task observe each other in order.
use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};

use rad_core::{
    ActorId, ExposureConfig, Position, RadiationSource, SourceId, TickSummary, Timestamp,
};

use super::errors::{Result, RuntimeError};
use super::types::{ConsumeOutcome, HealingItem, ReloadSummary, SourceUpdate};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Create a source. Parameters are clamped; names must be unique
    /// (case-insensitive) or [`RuntimeError::DuplicateSourceName`] is returned.
    pub async fn create_source(
        &self,
        name: impl Into<String>,
        position: Position,
        radius: i64,
        strength: i64,
        power: i64,
    ) -> Result<RadiationSource> {
        let name = name.into();
        self.request(|reply| Command::CreateSource {
            name,
            position,
            radius,
            strength,
            power,
            reply,
        })
        .await?
    }

    pub async fn source(&self, id: SourceId) -> Result<Option<RadiationSource>> {
        self.request(|reply| Command::Source { id, reply }).await
    }

    /// Case-insensitive lookup by name.
    pub async fn source_by_name(&self, name: impl Into<String>) -> Result<Option<RadiationSource>> {
        let name = name.into();
        self.request(|reply| Command::SourceByName { name, reply })
            .await
    }

    /// Returns `false` if no source had this id.
    pub async fn remove_source(&self, id: SourceId) -> Result<bool> {
        self.request(|reply| Command::RemoveSource { id, reply })
            .await
    }

    pub async fn remove_source_by_name(&self, name: impl Into<String>) -> Result<bool> {
        let name = name.into();
        self.request(|reply| Command::RemoveSourceByName { name, reply })
            .await
    }

    /// Apply a partial update. `Ok(None)` if the source does not exist.
    pub async fn update_source(
        &self,
        id: SourceId,
        update: SourceUpdate,
    ) -> Result<Option<RadiationSource>> {
        self.request(|reply| Command::UpdateSource { id, update, reply })
            .await?
    }

    /// Every source, ordered by id.
    pub async fn sources(&self) -> Result<Vec<RadiationSource>> {
        self.request(|reply| Command::Sources {
            active_only: false,
            reply,
        })
        .await
    }

    pub async fn active_sources(&self) -> Result<Vec<RadiationSource>> {
        self.request(|reply| Command::Sources {
            active_only: true,
            reply,
        })
        .await
    }

    /// Active sources whose radius contains `position`.
    pub async fn sources_near(&self, position: Position) -> Result<Vec<RadiationSource>> {
        self.request(|reply| Command::SourcesNear { position, reply })
            .await
    }

    /// Instantaneous field level at `position` (max over sources).
    pub async fn level_at(&self, position: Position) -> Result<u32> {
        self.request(|reply| Command::LevelAt { position, reply })
            .await
    }

    pub async fn exposure(&self, actor: ActorId) -> Result<u32> {
        self.request(|reply| Command::Exposure { actor, reply })
            .await
    }

    /// Set exposure directly (clamped). Returns the stored level.
    pub async fn set_exposure(&self, actor: ActorId, level: i64) -> Result<u32> {
        self.request(|reply| Command::SetExposure {
            actor,
            level,
            reply,
        })
        .await
    }

    /// Add resistance-adjusted exposure. The actor must be online so its
    /// equipment and exemption can be read.
    pub async fn add_exposure(&self, actor: ActorId, amount: u32) -> Result<u32> {
        self.request(|reply| Command::AddExposure {
            actor,
            amount,
            reply,
        })
        .await?
    }

    /// Remove exposure, bypassing resistance. Returns the stored level.
    pub async fn subtract_exposure(&self, actor: ActorId, amount: u32) -> Result<u32> {
        self.request(|reply| Command::SubtractExposure {
            actor,
            amount,
            reply,
        })
        .await
    }

    /// Forget every actor's exposure and buff.
    pub async fn reset_exposure(&self) -> Result<()> {
        self.request(|reply| Command::ResetExposure { reply }).await
    }

    /// Current resistance fraction of an online actor.
    pub async fn resistance(&self, actor: ActorId) -> Result<f64> {
        self.request(|reply| Command::Resistance { actor, reply })
            .await?
    }

    /// Start or restart the timed resistance buff. Returns its expiry.
    ///
    /// Buffs run in whole seconds; a partial second rounds up.
    pub async fn apply_timed_buff(&self, actor: ActorId, duration: Duration) -> Result<Timestamp> {
        let duration_seconds = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
        self.request(|reply| Command::ApplyTimedBuff {
            actor,
            duration_seconds,
            reply,
        })
        .await
    }

    pub async fn has_active_buff(&self, actor: ActorId) -> Result<bool> {
        self.request(|reply| Command::HasActiveBuff { actor, reply })
            .await
    }

    /// Actor left: drop its indicator, keep exposure and buff.
    pub async fn release(&self, actor: ActorId) -> Result<bool> {
        self.request(|reply| Command::Release { actor, reply })
            .await
    }

    /// Actor joined: re-announce its level so the indicator comes back.
    pub async fn refresh(&self, actor: ActorId) -> Result<u32> {
        self.request(|reply| Command::Refresh { actor, reply })
            .await
    }

    pub async fn consume(&self, actor: ActorId, item: HealingItem) -> Result<ConsumeOutcome> {
        self.request(|reply| Command::Consume { actor, item, reply })
            .await
    }

    /// Run one exposure check now, independent of the periodic interval.
    pub async fn tick(&self) -> Result<TickSummary> {
        self.request(|reply| Command::Tick { reply }).await
    }

    /// Persist sources and exposure records.
    pub async fn save(&self) -> Result<()> {
        self.request(|reply| Command::Save { reply }).await?
    }

    /// Save, apply `config`, then re-read sources from storage.
    pub async fn reload(&self, config: ExposureConfig) -> Result<ReloadSummary> {
        let config = Box::new(config);
        self.request(|reply| Command::Reload { config, reply })
            .await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Exposure` - Level changes and threshold status effects
    /// - `Topic::Effects` - Periodic damage and particle requests
    /// - `Topic::Sources` - Source creation, updates, removal and reloads
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use rad_runtime::Topic;
    ///
    /// let mut exposure_rx = handle.subscribe(Topic::Exposure);
    /// while let Ok(event) = exposure_rx.recv().await {
    ///     // Update indicators
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
