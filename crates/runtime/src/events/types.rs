//! Event types for different topics.

use rad_core::{
    ActorId, IndicatorColor, IndicatorStyle, ParticleKind, RadiationSource, SoundCue, SourceId,
    StatusEffect,
};
use serde::{Deserialize, Serialize};

/// Events on [`Topic::Exposure`](super::Topic::Exposure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// Accumulated exposure moved from `old` to `new`.
    ///
    /// `old == new` when a returning actor's level is re-announced.
    LevelChanged {
        actor: ActorId,
        old: u32,
        new: u32,
        /// `None` when the indicator is disabled.
        indicator: Option<IndicatorUpdate>,
    },

    /// Apply every status effect configured at or below `level`.
    ThresholdEffectsDue {
        actor: ActorId,
        level: u32,
        effects: Vec<StatusEffect>,
    },
}

/// What the host should do with an actor's progress indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicatorUpdate {
    Show(IndicatorView),
    Hide,
}

/// Fully rendered indicator state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorView {
    /// Title with `{level}` substituted and `&` colour codes translated.
    pub title: String,
    /// `level / 100`, capped at 1.
    pub progress: f64,
    pub color: IndicatorColor,
    pub style: IndicatorStyle,
}

/// Events on [`Topic::Effects`](super::Topic::Effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectEvent {
    /// Deal `amount` damage; play `sound` if present.
    PeriodicDamageDue {
        actor: ActorId,
        amount: f64,
        sound: Option<SoundCue>,
    },

    /// Spawn `count` particles of `particle` around the actor.
    ShowParticlesRequested {
        actor: ActorId,
        particle: ParticleKind,
        count: u32,
    },
}

/// Events on [`Topic::Sources`](super::Topic::Sources)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceEvent {
    Created(RadiationSource),
    Updated(RadiationSource),
    Removed { id: SourceId, name: String },
    /// Sources were re-read from storage.
    Reloaded { count: usize },
}
