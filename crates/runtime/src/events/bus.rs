//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{EffectEvent, LevelEvent, SourceEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Exposure level changes and threshold status effects
    Exposure,
    /// Periodic damage and cosmetic particles
    Effects,
    /// Source registry mutations and reloads
    Sources,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Exposure(LevelEvent),
    Effects(EffectEvent),
    Sources(SourceEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Exposure(_) => Topic::Exposure,
            Event::Effects(_) => Topic::Effects,
            Event::Sources(_) => Topic::Sources,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; a slow subscriber
/// lags and skips events instead of stalling the simulation.
#[derive(Clone)]
pub struct EventBus {
    exposure: broadcast::Sender<Event>,
    effects: broadcast::Sender<Event>,
    sources: broadcast::Sender<Event>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            exposure: broadcast::channel(capacity).0,
            effects: broadcast::channel(capacity).0,
            sources: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Exposure => &self.exposure,
            Topic::Effects => &self.effects,
            Topic::Sources => &self.sources,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::ActorId;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut sources = bus.subscribe(Topic::Sources);
        let mut exposure = bus.subscribe(Topic::Exposure);

        bus.publish(Event::Sources(SourceEvent::Reloaded { count: 2 }));
        bus.publish(Event::Exposure(LevelEvent::LevelChanged {
            actor: ActorId(1),
            old: 0,
            new: 4,
            indicator: None,
        }));

        assert_eq!(
            sources.recv().await.unwrap(),
            Event::Sources(SourceEvent::Reloaded { count: 2 })
        );
        assert!(sources.try_recv().is_err());
        assert_eq!(exposure.recv().await.unwrap().topic(), Topic::Exposure);
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::with_capacity(0);
        bus.publish(Event::Sources(SourceEvent::Reloaded { count: 0 }));
    }

    #[test]
    fn subscribe_multiple_returns_one_receiver_per_topic() {
        let bus = EventBus::default();
        let receivers = bus.subscribe_multiple(&[Topic::Exposure, Topic::Effects]);
        assert_eq!(receivers.len(), 2);
        assert!(receivers.contains_key(&Topic::Effects));
    }
}
