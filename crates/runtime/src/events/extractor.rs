//! Turns core exposure events into topic events.
//!
//! The core emits bare signals (`LevelChanged(actor, old, new)` and friends).
//! The extractor attaches what the presentation layer needs to act on them:
//! parsed status effects, the rendered indicator, the damage sound and the
//! particle kind. Configuration strings are parsed once, when the extractor is
//! built; anything that fails to parse is logged there and left out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rad_core::{
    ExposureConfig, ExposureEvent, IndicatorColor, IndicatorStyle, ParticleKind,
    ParticlesConfig, SoundCue, StatusEffect,
};

use super::bus::Event;
use super::types::{EffectEvent, IndicatorUpdate, IndicatorView, LevelEvent};

/// Indicator settings with colour and style already resolved.
#[derive(Debug, Clone)]
struct IndicatorTemplate {
    title: String,
    color: IndicatorColor,
    style: IndicatorStyle,
}

impl IndicatorTemplate {
    fn render(&self, level: u32) -> IndicatorView {
        let title = self
            .title
            .replace("{level}", &level.to_string())
            .replace('&', "§");

        IndicatorView {
            title,
            progress: (f64::from(level) / 100.0).min(1.0),
            color: self.color,
            style: self.style,
        }
    }
}

/// Enriches [`ExposureEvent`]s with configured presentation details.
#[derive(Debug, Clone)]
pub struct EventExtractor {
    /// Ascending by threshold.
    thresholds: Vec<(u32, Vec<StatusEffect>)>,
    particle: Option<ParticleKind>,
    particle_frequency: u32,
    sound: Option<SoundCue>,
    indicator: Option<IndicatorTemplate>,
    rng: StdRng,
}

impl EventExtractor {
    pub fn new(config: &ExposureConfig) -> Self {
        Self::build(config, StdRng::from_entropy())
    }

    /// Deterministic particle sampling, for tests.
    pub fn with_seed(config: &ExposureConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: &ExposureConfig, rng: StdRng) -> Self {
        let (parsed, problems) = config.damage.effect_thresholds();
        for problem in problems {
            tracing::warn!("{problem}");
        }

        let thresholds = parsed
            .into_iter()
            .map(|entry| {
                let effects = entry
                    .effects
                    .iter()
                    .filter_map(|raw| match raw.parse::<StatusEffect>() {
                        Ok(effect) => Some(effect),
                        Err(e) => {
                            tracing::warn!(threshold = entry.threshold, "{e}");
                            None
                        }
                    })
                    .collect();
                (entry.threshold, effects)
            })
            .collect();

        let particles = &config.effects.particles;
        let particle = match particles.kind.parse::<ParticleKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                tracing::debug!(kind = %particles.kind, "unknown particle kind; particles disabled");
                None
            }
        };

        let sound_config = &config.effects.sounds.damage;
        let sound = if sound_config.enabled {
            SoundCue::parse(
                &sound_config.sound,
                sound_config.volume,
                sound_config.pitch,
            )
            .map_err(|e| tracing::warn!("{e}; damage sound disabled"))
            .ok()
        } else {
            None
        };

        let indicator_config = &config.effects.indicator;
        let indicator = indicator_config.enabled.then(|| IndicatorTemplate {
            title: indicator_config.title.clone(),
            color: indicator_config.color.parse().unwrap_or_else(|_| {
                tracing::warn!(color = %indicator_config.color, "invalid indicator color, using RED");
                IndicatorColor::default()
            }),
            style: indicator_config.style.parse().unwrap_or_else(|_| {
                tracing::warn!(style = %indicator_config.style, "invalid indicator style, using SOLID");
                IndicatorStyle::default()
            }),
        });

        Self {
            thresholds,
            particle,
            particle_frequency: particles.frequency.min(ParticlesConfig::MAX_FREQUENCY),
            sound,
            indicator,
            rng,
        }
    }

    /// Status effects for every threshold at or below `level`.
    pub fn effects_for(&self, level: u32) -> Vec<StatusEffect> {
        self.thresholds
            .iter()
            .take_while(|(threshold, _)| *threshold <= level)
            .flat_map(|(_, effects)| effects.iter().copied())
            .collect()
    }

    /// Converts one core event. `None` means there is nothing to publish.
    pub fn extract(&mut self, event: ExposureEvent) -> Option<Event> {
        match event {
            ExposureEvent::LevelChanged { actor, old, new } => {
                let indicator = self.indicator.as_ref().map(|template| {
                    if new > 0 {
                        IndicatorUpdate::Show(template.render(new))
                    } else {
                        IndicatorUpdate::Hide
                    }
                });
                Some(Event::Exposure(LevelEvent::LevelChanged {
                    actor,
                    old,
                    new,
                    indicator,
                }))
            }
            ExposureEvent::ThresholdEffectsDue { actor, level } => {
                let effects = self.effects_for(level);
                (!effects.is_empty()).then_some(Event::Exposure(LevelEvent::ThresholdEffectsDue {
                    actor,
                    level,
                    effects,
                }))
            }
            ExposureEvent::PeriodicDamageDue { actor, amount } => {
                Some(Event::Effects(EffectEvent::PeriodicDamageDue {
                    actor,
                    amount,
                    sound: self.sound.clone(),
                }))
            }
            ExposureEvent::ShowParticlesRequested { actor } => {
                let particle = self.particle?;
                if self.rng.gen_range(0..ParticlesConfig::MAX_FREQUENCY) >= self.particle_frequency {
                    return None;
                }
                Some(Event::Effects(EffectEvent::ShowParticlesRequested {
                    actor,
                    particle,
                    count: ParticleKind::BURST,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::{ActorId, StatusEffectKind};

    fn level_changed(new: u32) -> ExposureEvent {
        ExposureEvent::LevelChanged {
            actor: ActorId(1),
            old: 0,
            new,
        }
    }

    #[test]
    fn renders_indicator_title_and_progress() {
        let mut extractor = EventExtractor::with_seed(&ExposureConfig::default(), 7);

        let Some(Event::Exposure(LevelEvent::LevelChanged { indicator, .. })) =
            extractor.extract(level_changed(42))
        else {
            panic!("expected level event");
        };

        assert_eq!(
            indicator,
            Some(IndicatorUpdate::Show(IndicatorView {
                title: "§c☢ Radiation Level: 42% ☢".to_string(),
                progress: 0.42,
                color: IndicatorColor::Red,
                style: IndicatorStyle::Solid,
            }))
        );
    }

    #[test]
    fn level_zero_hides_indicator_and_disabled_indicator_is_absent() {
        let mut extractor = EventExtractor::with_seed(&ExposureConfig::default(), 7);
        let Some(Event::Exposure(LevelEvent::LevelChanged { indicator, .. })) =
            extractor.extract(level_changed(0))
        else {
            panic!("expected level event");
        };
        assert_eq!(indicator, Some(IndicatorUpdate::Hide));

        let mut config = ExposureConfig::default();
        config.effects.indicator.enabled = false;
        let mut extractor = EventExtractor::with_seed(&config, 7);
        let Some(Event::Exposure(LevelEvent::LevelChanged { indicator, .. })) =
            extractor.extract(level_changed(10))
        else {
            panic!("expected level event");
        };
        assert_eq!(indicator, None);
    }

    #[test]
    fn invalid_color_and_style_fall_back() {
        let mut config = ExposureConfig::default();
        config.effects.indicator.color = "MAUVE".to_string();
        config.effects.indicator.style = "SEGMENTED_10".to_string();
        let mut extractor = EventExtractor::with_seed(&config, 7);

        let Some(Event::Exposure(LevelEvent::LevelChanged {
            indicator: Some(IndicatorUpdate::Show(view)),
            ..
        })) = extractor.extract(level_changed(100))
        else {
            panic!("expected shown indicator");
        };
        assert_eq!(view.color, IndicatorColor::Red);
        assert_eq!(view.style, IndicatorStyle::Segmented10);
        assert_eq!(view.progress, 1.0);
    }

    #[test]
    fn threshold_effects_accumulate_up_to_level() {
        let extractor = EventExtractor::with_seed(&ExposureConfig::default(), 7);

        let kinds: Vec<_> = extractor.effects_for(60).iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StatusEffectKind::Hunger,
                StatusEffectKind::Weakness,
                StatusEffectKind::Nausea,
            ]
        );
        assert!(extractor.effects_for(24).is_empty());
    }

    #[test]
    fn unknown_effect_strings_are_dropped() {
        let mut config = ExposureConfig::default();
        config.damage.effects.clear();
        config.damage.effects.insert(
            "10".to_string(),
            vec!["LEVITATION:0:5".to_string(), "NOT_AN_EFFECT:0:5".to_string()],
        );
        config.damage.effects.insert("ten".to_string(), vec!["HUNGER:0:5".to_string()]);
        let mut extractor = EventExtractor::with_seed(&config, 7);

        let event = extractor.extract(ExposureEvent::ThresholdEffectsDue {
            actor: ActorId(3),
            level: 15,
        });
        let Some(Event::Exposure(LevelEvent::ThresholdEffectsDue { effects, .. })) = event else {
            panic!("expected threshold event");
        };
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, StatusEffectKind::Levitation);
        assert_eq!(effects[0].duration_ticks, 100);
    }

    #[test]
    fn damage_carries_sound_unless_disabled() {
        let mut extractor = EventExtractor::with_seed(&ExposureConfig::default(), 7);
        let Some(Event::Effects(EffectEvent::PeriodicDamageDue { sound, amount, .. })) = extractor
            .extract(ExposureEvent::PeriodicDamageDue {
                actor: ActorId(1),
                amount: 1.5,
            })
        else {
            panic!("expected damage event");
        };
        assert_eq!(amount, 1.5);
        assert_eq!(sound.unwrap().sound, "ENTITY_PLAYER_HURT");

        let mut config = ExposureConfig::default();
        config.effects.sounds.damage.sound = "not a sound".to_string();
        let mut extractor = EventExtractor::with_seed(&config, 7);
        let Some(Event::Effects(EffectEvent::PeriodicDamageDue { sound, .. })) = extractor
            .extract(ExposureEvent::PeriodicDamageDue {
                actor: ActorId(1),
                amount: 1.5,
            })
        else {
            panic!("expected damage event");
        };
        assert!(sound.is_none());
    }

    #[test]
    fn particle_frequency_bounds() {
        let request = ExposureEvent::ShowParticlesRequested { actor: ActorId(1) };

        let mut config = ExposureConfig::default();
        config.effects.particles.frequency = 20;
        let mut always = EventExtractor::with_seed(&config, 1);
        for _ in 0..50 {
            assert_eq!(
                always.extract(request.clone()),
                Some(Event::Effects(EffectEvent::ShowParticlesRequested {
                    actor: ActorId(1),
                    particle: ParticleKind::Redstone,
                    count: 3,
                }))
            );
        }

        config.effects.particles.frequency = 0;
        let mut never = EventExtractor::with_seed(&config, 1);
        assert!((0..50).all(|_| never.extract(request.clone()).is_none()));

        config.effects.particles.frequency = 20;
        config.effects.particles.kind = "SPARKLES".to_string();
        let mut unknown = EventExtractor::with_seed(&config, 1);
        assert!(unknown.extract(request).is_none());
    }
}
