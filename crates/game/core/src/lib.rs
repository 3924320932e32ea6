//! Deterministic radiation exposure rules.
//!
//! `rad-core` models radiation sources with a linear falloff field, aggregates
//! overlapping sources at a point, and tracks each actor's accumulated exposure
//! with decay, resistance and timed buffs. It performs no I/O and reads no
//! clock; hosts supply positions through [`ActorOracle`] and time through
//! [`Timestamp`] arguments, and drive [`ExposureEngine::tick`] on their own
//! schedule.
pub mod config;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod exposure;
pub mod registry;
pub mod snapshot;
pub mod source;
pub mod state;

pub use config::{
    DamageConfig, EffectThreshold, EffectsConfig, EquipmentConfig, ExposureConfig, GainConfig,
    GeneralConfig, HealingConfig, IndicatorConfig, IntegrationConfig, MaterialResistance,
    ParticlesConfig, RadAwayConfig, RadXConfig, SoundConfig, SoundsConfig, SourcesConfig,
    StorageConfig,
};
pub use effects::{
    EffectParseError, IndicatorColor, IndicatorStyle, ParticleKind, SoundCue, StatusEffect,
    StatusEffectKind,
};
pub use engine::{ExposureEngine, TickSummary};
pub use env::{ActorOracle, ActorRoster, ActorView};
pub use error::ConfigError;
pub use events::ExposureEvent;
pub use exposure::{ExposureRules, ExposureState};
pub use registry::SourceRegistry;
pub use snapshot::{ExposureEntry, SourceRecord, SourceStore};
pub use source::RadiationSource;
pub use state::{ActorId, Position, SourceId, Timestamp, WorldId};
