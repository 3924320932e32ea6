//! Mirrors runtime events into the log.
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use rad_runtime::{
    EffectEvent, Event, IndicatorUpdate, LevelEvent, RuntimeHandle, SourceEvent, Topic,
};

/// Spawn one forwarding task per topic. Tasks end when the runtime shuts down.
pub fn spawn(handle: &RuntimeHandle) -> Vec<JoinHandle<()>> {
    handle
        .subscribe_multiple(&[Topic::Exposure, Topic::Effects, Topic::Sources])
        .into_iter()
        .map(|(topic, rx)| tokio::spawn(forward(topic, rx)))
        .collect()
}

async fn forward(topic: Topic, mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => record(&event),
            Err(RecvError::Lagged(missed)) => warn!(%topic, missed, "event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn record(event: &Event) {
    // Particles fire every few ticks per actor; keep them out of the info log.
    if matches!(
        event,
        Event::Effects(EffectEvent::ShowParticlesRequested { .. })
    ) {
        debug!("{}", describe(event));
    } else {
        info!("{}", describe(event));
    }
}

/// One-line human readable summary of an event.
pub fn describe(event: &Event) -> String {
    match event {
        Event::Exposure(LevelEvent::LevelChanged {
            actor,
            old,
            new,
            indicator,
        }) => {
            let shown = match indicator {
                Some(IndicatorUpdate::Show(view)) => format!(" [{}]", view.title),
                Some(IndicatorUpdate::Hide) => " [indicator hidden]".to_string(),
                None => String::new(),
            };
            format!("{actor} exposure {old} -> {new}{shown}")
        }
        Event::Exposure(LevelEvent::ThresholdEffectsDue {
            actor,
            level,
            effects,
        }) => {
            let effects: Vec<String> = effects.iter().map(ToString::to_string).collect();
            format!("{actor} at {level} suffers {}", effects.join(", "))
        }
        Event::Effects(EffectEvent::PeriodicDamageDue {
            actor,
            amount,
            sound,
        }) => match sound {
            Some(cue) => format!("{actor} takes {amount:.2} damage ({})", cue.sound),
            None => format!("{actor} takes {amount:.2} damage"),
        },
        Event::Effects(EffectEvent::ShowParticlesRequested {
            actor,
            particle,
            count,
        }) => format!("{count} {particle} particles around {actor}"),
        Event::Sources(SourceEvent::Created(source)) => format!(
            "created {} '{}' at {}",
            source.id(),
            source.name(),
            source.position()
        ),
        Event::Sources(SourceEvent::Updated(source)) => {
            format!("updated {} '{}'", source.id(), source.name())
        }
        Event::Sources(SourceEvent::Removed { id, name }) => format!("removed {id} '{name}'"),
        Event::Sources(SourceEvent::Reloaded { count }) => {
            format!("reloaded {count} sources from storage")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::{ActorId, IndicatorColor, IndicatorStyle, ParticleKind, SourceId};
    use rad_runtime::IndicatorView;

    #[test]
    fn level_changes_include_the_indicator_title() {
        let event = Event::Exposure(LevelEvent::LevelChanged {
            actor: ActorId(4),
            old: 10,
            new: 12,
            indicator: Some(IndicatorUpdate::Show(IndicatorView {
                title: "Rads: 12".to_string(),
                progress: 0.12,
                color: IndicatorColor::Red,
                style: IndicatorStyle::Solid,
            })),
        });
        assert_eq!(describe(&event), "actor#4 exposure 10 -> 12 [Rads: 12]");

        let event = Event::Exposure(LevelEvent::LevelChanged {
            actor: ActorId(4),
            old: 1,
            new: 0,
            indicator: Some(IndicatorUpdate::Hide),
        });
        assert_eq!(describe(&event), "actor#4 exposure 1 -> 0 [indicator hidden]");
    }

    #[test]
    fn effect_and_source_events_read_naturally() {
        let damage = Event::Effects(EffectEvent::PeriodicDamageDue {
            actor: ActorId(1),
            amount: 1.5,
            sound: None,
        });
        assert_eq!(describe(&damage), "actor#1 takes 1.50 damage");

        let particles = Event::Effects(EffectEvent::ShowParticlesRequested {
            actor: ActorId(1),
            particle: ParticleKind::Redstone,
            count: 3,
        });
        assert_eq!(describe(&particles), "3 REDSTONE particles around actor#1");

        let removed = Event::Sources(SourceEvent::Removed {
            id: SourceId(7),
            name: "Spill".to_string(),
        });
        assert_eq!(describe(&removed), "removed source#7 'Spill'");
    }
}
