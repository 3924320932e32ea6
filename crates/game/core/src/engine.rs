//! Periodic exposure tick.
//!
//! [`ExposureEngine::tick`] is a plain synchronous function: it reads the
//! registry, mutates the exposure state and returns the events produced. It
//! holds no locks and performs no I/O; scheduling belongs to the caller.

use crate::config::{DamageConfig, ExposureConfig, GainConfig, SourcesConfig};
use crate::env::ActorOracle;
use crate::events::ExposureEvent;
use crate::exposure::ExposureState;
use crate::registry::SourceRegistry;
use crate::state::{ActorId, Timestamp};

/// Drives accumulation, decay and periodic damage.
#[derive(Clone, Debug)]
pub struct ExposureEngine {
    gain: GainConfig,
    damage: DamageConfig,
    particles_enabled: bool,
    sources: SourcesConfig,
    damage_counter: u32,
}

/// Per-tick counters, useful for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub exposed: usize,
    pub decayed: usize,
    pub skipped: usize,
    pub damaged: usize,
}

impl ExposureEngine {
    pub fn new(config: &ExposureConfig) -> Self {
        Self {
            gain: config.exposure.clone(),
            damage: config.damage.clone(),
            particles_enabled: config.effects.particles.enabled,
            sources: config.sources.clone(),
            damage_counter: 0,
        }
    }

    /// Applies a reloaded configuration. The damage counter keeps running.
    pub fn reconfigure(&mut self, config: &ExposureConfig) {
        let counter = self.damage_counter;
        *self = Self::new(config);
        self.damage_counter = counter;
    }

    /// Checks elapsed since the last damage pass.
    pub fn damage_counter(&self) -> u32 {
        self.damage_counter
    }

    /// Runs one exposure check for every online actor.
    ///
    /// Events already queued on `state` are returned first, followed by the
    /// ones this tick produced.
    pub fn tick(
        &mut self,
        registry: &SourceRegistry,
        state: &mut ExposureState,
        actors: &dyn ActorOracle,
        now: Timestamp,
    ) -> (Vec<ExposureEvent>, TickSummary) {
        let mut summary = TickSummary::default();
        let online = actors.online_actors();

        for id in &online {
            let Some(actor) = actors.actor(*id) else {
                summary.skipped += 1;
                continue;
            };
            if actor.exempt || !self.sources.is_world_enabled(actor.position.world.as_str()) {
                summary.skipped += 1;
                continue;
            }

            let field = registry.level_at(&actor.position);
            if field > 0 {
                state.add(&actor, self.gain.gain_for(field), now);
                if self.particles_enabled {
                    state.emit(ExposureEvent::ShowParticlesRequested { actor: actor.id });
                }
                summary.exposed += 1;
            } else if state.get(actor.id) > 0 {
                state.subtract(actor.id, self.gain.decay_amount);
                summary.decayed += 1;
            }
        }

        self.damage_counter += 1;
        if self.damage_counter >= self.damage.interval {
            self.damage_counter = 0;
            if self.damage.enabled {
                summary.damaged = self.damage_pass(state, &online);
            }
        }

        (state.drain_events(), summary)
    }

    /// Every online actor strictly above the threshold takes scaled damage.
    fn damage_pass(&self, state: &mut ExposureState, online: &[ActorId]) -> usize {
        let mut damaged = 0;
        for &actor in online {
            let level = state.get(actor);
            if level > self.damage.threshold {
                state.emit(ExposureEvent::PeriodicDamageDue {
                    actor,
                    amount: self.damage.damage_for(level),
                });
                damaged += 1;
            }
        }
        damaged
    }
}
