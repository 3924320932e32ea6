//! Signals emitted by the exposure rules for the presentation layer.
//!
//! Events are fire-and-forget: nothing in the core waits for them to be
//! handled, and dropping them never changes simulation state.

use crate::state::ActorId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExposureEvent {
    /// Accumulated exposure moved from `old` to `new`.
    ///
    /// `old == new` only when the level is re-announced (see
    /// [`ExposureState::refresh`](crate::ExposureState::refresh)).
    LevelChanged { actor: ActorId, old: u32, new: u32 },
    /// Status effects for every configured threshold `<= level` should apply.
    ThresholdEffectsDue { actor: ActorId, level: u32 },
    /// Periodic damage pass selected this actor.
    PeriodicDamageDue { actor: ActorId, amount: f64 },
    /// The actor stood inside a field this tick.
    ShowParticlesRequested { actor: ActorId },
}

impl ExposureEvent {
    pub fn actor(&self) -> ActorId {
        match self {
            Self::LevelChanged { actor, .. }
            | Self::ThresholdEffectsDue { actor, .. }
            | Self::PeriodicDamageDue { actor, .. }
            | Self::ShowParticlesRequested { actor } => *actor,
        }
    }
}
