//! Per-actor accumulated exposure, timed resistance buffs and indicator handles.
//!
//! [`ExposureState`] is pure state plus transition rules. It never reads a
//! clock: every time-dependent operation takes `now` explicitly, which keeps
//! buff expiry deterministic under test. Level changes are queued as
//! [`ExposureEvent`]s and handed out by [`ExposureState::drain_events`].

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{EquipmentConfig, ExposureConfig};
use crate::env::ActorView;
use crate::events::ExposureEvent;
use crate::snapshot::ExposureEntry;
use crate::state::{ActorId, Timestamp};

/// Configuration slice that governs exposure transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct ExposureRules {
    /// Upper clamp for accumulated exposure.
    pub max_level: u32,
    /// Resistance fraction granted while a timed buff is active.
    pub buff_resistance: f64,
    /// Armour table; `None` when equipment resistance is disabled.
    pub equipment: Option<EquipmentConfig>,
    /// Whether [`ActorView::external_resistance`] counts.
    pub integration_enabled: bool,
    /// Lowest configured effect threshold; `None` disables threshold signals.
    pub min_effect_threshold: Option<u32>,
    /// Whether actors with exposure hold an indicator handle.
    pub indicator_enabled: bool,
}

impl ExposureRules {
    /// No combination of contributors may make an actor fully immune.
    pub const MAX_RESISTANCE: f64 = 0.95;

    pub fn from_config(config: &ExposureConfig) -> Self {
        let min_effect_threshold = if config.damage.enabled {
            let (thresholds, _) = config.damage.effect_thresholds();
            thresholds.first().map(|t| t.threshold)
        } else {
            None
        };

        Self {
            max_level: config.general.max_radiation_level,
            buff_resistance: config.healing.rad_x.resistance(),
            equipment: config
                .equipment
                .enabled
                .then(|| config.equipment.clone()),
            integration_enabled: config.integration.enabled,
            min_effect_threshold,
            indicator_enabled: config.effects.indicator.enabled,
        }
    }
}

impl Default for ExposureRules {
    fn default() -> Self {
        Self::from_config(&ExposureConfig::default())
    }
}

/// Exposure bookkeeping for every actor ever referenced.
///
/// Actors are tracked lazily: an unknown actor reads as exposure 0 with no
/// buff. Levels and buffs survive [`release`](Self::release); only
/// [`reset`](Self::reset) forgets them.
#[derive(Clone, Debug, Default)]
pub struct ExposureState {
    rules: ExposureRules,
    levels: BTreeMap<ActorId, u32>,
    buffs: BTreeMap<ActorId, Timestamp>,
    indicators: BTreeSet<ActorId>,
    events: Vec<ExposureEvent>,
}

impl ExposureState {
    pub fn new(rules: ExposureRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &ExposureRules {
        &self.rules
    }

    /// Swaps in new rules, silently re-clamping stored levels to the new max.
    pub fn set_rules(&mut self, rules: ExposureRules) {
        let max = rules.max_level;
        for level in self.levels.values_mut() {
            *level = (*level).min(max);
        }
        if !rules.indicator_enabled {
            self.indicators.clear();
        }
        self.rules = rules;
    }

    pub fn get(&self, actor: ActorId) -> u32 {
        self.levels.get(&actor).copied().unwrap_or(0)
    }

    /// Stores `level` clamped to `[0, max]`.
    ///
    /// A changed value queues [`ExposureEvent::LevelChanged`] and moves the
    /// indicator handle; writing the value already stored does neither.
    /// [`ExposureEvent::ThresholdEffectsDue`] is queued on every call whose
    /// clamped level reaches the lowest effect threshold, so an actor pinned
    /// at the maximum keeps receiving its effects.
    pub fn set(&mut self, actor: ActorId, level: i64) {
        let new = level.clamp(0, i64::from(self.rules.max_level)) as u32;
        let old = self.get(actor);

        if old != new {
            self.levels.insert(actor, new);
            self.events
                .push(ExposureEvent::LevelChanged { actor, old, new });

            if self.rules.indicator_enabled {
                if new > 0 {
                    self.indicators.insert(actor);
                } else {
                    self.indicators.remove(&actor);
                }
            }
        }

        if self
            .rules
            .min_effect_threshold
            .is_some_and(|threshold| new >= threshold)
        {
            self.events
                .push(ExposureEvent::ThresholdEffectsDue { actor, level: new });
        }
    }

    /// Adds resistance-adjusted exposure.
    ///
    /// Exempt actors are skipped. The adjusted amount is floored, and a
    /// non-positive result changes nothing.
    pub fn add(&mut self, actor: &ActorView, amount: u32, now: Timestamp) {
        if actor.exempt {
            return;
        }

        let resistance = self.resistance(actor, now);
        let effective = (f64::from(amount) * (1.0 - resistance)).floor() as i64;
        if effective <= 0 {
            return;
        }

        let current = i64::from(self.get(actor.id));
        self.set(actor.id, current + effective);
    }

    /// Removes exposure without consulting resistance.
    pub fn subtract(&mut self, actor: ActorId, amount: u32) {
        let current = i64::from(self.get(actor));
        self.set(actor, current - i64::from(amount));
    }

    /// Combined resistance fraction in `[0, 0.95]`.
    ///
    /// Checking the buff purges it if it has expired.
    pub fn resistance(&mut self, actor: &ActorView, now: Timestamp) -> f64 {
        let mut resistance = 0.0;

        if self.has_active_buff(actor.id, now) {
            resistance += self.rules.buff_resistance;
        }
        if let Some(equipment) = &self.rules.equipment {
            resistance += equipment.resistance_for(&actor.worn_materials);
        }
        if self.rules.integration_enabled && actor.external_resistance.is_finite() {
            resistance += actor.external_resistance;
        }

        resistance.clamp(0.0, ExposureRules::MAX_RESISTANCE)
    }

    /// Starts (or restarts) the timed buff; durations never stack.
    pub fn apply_timed_buff(
        &mut self,
        actor: ActorId,
        duration_seconds: u64,
        now: Timestamp,
    ) -> Timestamp {
        let expiry = now.plus_seconds(duration_seconds);
        self.buffs.insert(actor, expiry);
        expiry
    }

    /// True iff a buff is stored and expires strictly after `now`.
    ///
    /// An expired entry is removed on the same call.
    pub fn has_active_buff(&mut self, actor: ActorId, now: Timestamp) -> bool {
        self.buff_expiry(actor, now).is_some()
    }

    /// Expiry of the live buff, purging an expired one.
    pub fn buff_expiry(&mut self, actor: ActorId, now: Timestamp) -> Option<Timestamp> {
        match self.buffs.get(&actor).copied() {
            Some(expiry) if expiry > now => Some(expiry),
            Some(_) => {
                self.buffs.remove(&actor);
                None
            }
            None => None,
        }
    }

    pub fn has_indicator(&self, actor: ActorId) -> bool {
        self.indicators.contains(&actor)
    }

    /// Drops the actor's indicator handle. Exposure and buff are retained.
    ///
    /// Returns true if a handle was held.
    pub fn release(&mut self, actor: ActorId) -> bool {
        self.indicators.remove(&actor)
    }

    /// Re-announces the current level so a returning actor gets its indicator
    /// back. Emits `LevelChanged` with `old == new` when exposure is above zero.
    pub fn refresh(&mut self, actor: ActorId) -> u32 {
        let level = self.get(actor);
        if level > 0 {
            if self.rules.indicator_enabled {
                self.indicators.insert(actor);
            }
            self.events.push(ExposureEvent::LevelChanged {
                actor,
                old: level,
                new: level,
            });
        }
        level
    }

    /// Forgets every level, buff and handle.
    ///
    /// Actors that had exposure get a final `LevelChanged` down to zero.
    pub fn reset(&mut self) {
        let levels = std::mem::take(&mut self.levels);
        for (actor, old) in levels {
            if old > 0 {
                self.events
                    .push(ExposureEvent::LevelChanged { actor, old, new: 0 });
            }
        }
        self.buffs.clear();
        self.indicators.clear();
    }

    /// Actors currently holding exposure above zero.
    pub fn exposed_actors(&self) -> impl Iterator<Item = (ActorId, u32)> + '_ {
        self.levels
            .iter()
            .filter(|&(_, &level)| level > 0)
            .map(|(&actor, &level)| (actor, level))
    }

    pub(crate) fn emit(&mut self, event: ExposureEvent) {
        self.events.push(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ExposureEvent> {
        std::mem::take(&mut self.events)
    }

    /// Persistable records: actors with exposure or a buff still live at `now`.
    pub fn export(&self, now: Timestamp) -> Vec<ExposureEntry> {
        let actors: BTreeSet<ActorId> = self
            .levels
            .keys()
            .chain(self.buffs.keys())
            .copied()
            .collect();

        actors
            .into_iter()
            .filter_map(|actor| {
                let level = self.get(actor);
                let buff_expiry = self.buffs.get(&actor).copied().filter(|&e| e > now);
                (level > 0 || buff_expiry.is_some()).then_some(ExposureEntry {
                    actor,
                    level,
                    buff_expiry,
                })
            })
            .collect()
    }

    /// Replaces all levels and buffs with `entries`, emitting nothing.
    ///
    /// Levels are clamped to the current max and expired buffs are dropped.
    /// Indicator handles are left to [`refresh`](Self::refresh).
    pub fn restore(&mut self, entries: impl IntoIterator<Item = ExposureEntry>, now: Timestamp) {
        self.levels.clear();
        self.buffs.clear();
        self.indicators.clear();

        for entry in entries {
            let level = entry.level.min(self.rules.max_level);
            if level > 0 {
                self.levels.insert(entry.actor, level);
            }
            if let Some(expiry) = entry.buff_expiry.filter(|&e| e > now) {
                self.buffs.insert(entry.actor, expiry);
            }
        }
    }
}
