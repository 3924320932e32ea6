//! Topic-based event bus for runtime events.
//!
//! Core [`rad_core::ExposureEvent`]s are enriched by the [`EventExtractor`]
//! with the configured presentation details (effects, particle kind, sound,
//! indicator view) and published to a topic. Consumers subscribe only to the
//! topics they render.

mod bus;
mod extractor;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use extractor::EventExtractor;
pub use types::{EffectEvent, IndicatorUpdate, IndicatorView, LevelEvent, SourceEvent};
