//! Tunable parameters for the exposure simulation.
//!
//! Every section has documented defaults so a partially written (or entirely
//! missing) configuration file still yields a working setup. String-valued
//! vocabularies (effect names, particle kinds, indicator colours) are kept
//! verbatim here and parsed where they are used; see [`crate::effects`].

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Complete configuration tree.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExposureConfig {
    pub general: GeneralConfig,
    pub sources: SourcesConfig,
    pub exposure: GainConfig,
    pub damage: DamageConfig,
    pub equipment: EquipmentConfig,
    pub integration: IntegrationConfig,
    pub healing: HealingConfig,
    pub effects: EffectsConfig,
    pub storage: StorageConfig,
}

impl ExposureConfig {
    /// Replaces values that would break the tick arithmetic with defaults.
    ///
    /// Returns the problems that were corrected so the caller can log them.
    pub fn sanitize(&mut self) -> Vec<ConfigError> {
        let mut problems = Vec::new();

        if self.general.max_radiation_level == 0 {
            problems.push(ConfigError::invalid_value(
                "general.max_radiation_level",
                0,
                GeneralConfig::DEFAULT_MAX_RADIATION_LEVEL,
            ));
            self.general.max_radiation_level = GeneralConfig::DEFAULT_MAX_RADIATION_LEVEL;
        }
        if self.general.check_interval == 0 {
            problems.push(ConfigError::invalid_value(
                "general.check_interval",
                0,
                GeneralConfig::DEFAULT_CHECK_INTERVAL,
            ));
            self.general.check_interval = GeneralConfig::DEFAULT_CHECK_INTERVAL;
        }
        if self.general.tick_rate_hz == 0 {
            problems.push(ConfigError::invalid_value(
                "general.tick_rate_hz",
                0,
                GeneralConfig::DEFAULT_TICK_RATE_HZ,
            ));
            self.general.tick_rate_hz = GeneralConfig::DEFAULT_TICK_RATE_HZ;
        }
        if self.exposure.gain_divisor == 0 {
            problems.push(ConfigError::invalid_value(
                "exposure.gain_divisor",
                0,
                GainConfig::DEFAULT_GAIN_DIVISOR,
            ));
            self.exposure.gain_divisor = GainConfig::DEFAULT_GAIN_DIVISOR;
        }
        if self.damage.interval == 0 {
            problems.push(ConfigError::invalid_value(
                "damage.interval",
                0,
                DamageConfig::DEFAULT_INTERVAL,
            ));
            self.damage.interval = DamageConfig::DEFAULT_INTERVAL;
        }
        if !self.damage.base_amount.is_finite() || self.damage.base_amount < 0.0 {
            problems.push(ConfigError::invalid_value(
                "damage.base_amount",
                self.damage.base_amount,
                DamageConfig::DEFAULT_BASE_AMOUNT,
            ));
            self.damage.base_amount = DamageConfig::DEFAULT_BASE_AMOUNT;
        }
        let frequency = self.effects.particles.frequency;
        if frequency > ParticlesConfig::MAX_FREQUENCY {
            problems.push(ConfigError::invalid_value(
                "effects.particles.frequency",
                frequency,
                ParticlesConfig::MAX_FREQUENCY,
            ));
            self.effects.particles.frequency = ParticlesConfig::MAX_FREQUENCY;
        }

        problems
    }
}

/// Global knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneralConfig {
    /// Upper clamp for accumulated exposure.
    pub max_radiation_level: u32,
    /// Engine ticks between exposure checks.
    pub check_interval: u32,
    /// Base engine tick rate of the host.
    pub tick_rate_hz: u32,
    /// Emit registry mutations at debug level.
    pub debug: bool,
}

impl GeneralConfig {
    pub const DEFAULT_MAX_RADIATION_LEVEL: u32 = 100;
    pub const DEFAULT_CHECK_INTERVAL: u32 = 20;
    pub const DEFAULT_TICK_RATE_HZ: u32 = 20;

    /// Wall-clock period between exposure checks, in milliseconds.
    pub fn check_period_millis(&self) -> u64 {
        let rate = u64::from(self.tick_rate_hz.max(1));
        u64::from(self.check_interval.max(1)) * 1000 / rate
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_radiation_level: Self::DEFAULT_MAX_RADIATION_LEVEL,
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            debug: false,
        }
    }
}

/// Which worlds the tick looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourcesConfig {
    pub enabled_worlds: Vec<String>,
}

impl SourcesConfig {
    /// Returns true if `world` participates in the simulation.
    ///
    /// An empty allow-list enables every world.
    pub fn is_world_enabled(&self, world: &str) -> bool {
        self.enabled_worlds.is_empty() || self.enabled_worlds.iter().any(|w| w == world)
    }
}

/// Accumulation and decay rates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GainConfig {
    /// Field level is divided by this to get the per-tick gain (minimum 1).
    pub gain_divisor: u32,
    /// Exposure removed per tick while outside every field.
    pub decay_amount: u32,
}

impl GainConfig {
    pub const DEFAULT_GAIN_DIVISOR: u32 = 100;
    pub const DEFAULT_DECAY_AMOUNT: u32 = 1;

    /// Per-tick gain while standing in a field of `field_level`.
    pub fn gain_for(&self, field_level: u32) -> u32 {
        (field_level / self.gain_divisor.max(1)).max(1)
    }
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            gain_divisor: Self::DEFAULT_GAIN_DIVISOR,
            decay_amount: Self::DEFAULT_DECAY_AMOUNT,
        }
    }
}

/// Periodic damage and threshold status effects.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageConfig {
    pub enabled: bool,
    /// Exposure checks between damage passes.
    pub interval: u32,
    /// Damage applies strictly above this exposure.
    pub threshold: u32,
    /// Damage at exposure 100; scales linearly with exposure.
    pub base_amount: f64,
    /// Exposure threshold → effect strings (`KIND:AMPLIFIER:SECONDS`).
    pub effects: BTreeMap<String, Vec<String>>,
}

impl DamageConfig {
    pub const DEFAULT_INTERVAL: u32 = 60;
    pub const DEFAULT_THRESHOLD: u32 = 50;
    pub const DEFAULT_BASE_AMOUNT: f64 = 2.0;

    /// Parses the threshold keys, sorted ascending.
    ///
    /// Keys that are not integers are returned as errors and skipped.
    pub fn effect_thresholds(&self) -> (Vec<EffectThreshold>, Vec<ConfigError>) {
        let mut thresholds = Vec::with_capacity(self.effects.len());
        let mut problems = Vec::new();

        for (key, effects) in &self.effects {
            match key.trim().parse::<u32>() {
                Ok(threshold) => thresholds.push(EffectThreshold {
                    threshold,
                    effects: effects.clone(),
                }),
                Err(_) => problems.push(ConfigError::InvalidThreshold(key.clone())),
            }
        }

        thresholds.sort_by_key(|t| t.threshold);
        (thresholds, problems)
    }

    /// Damage dealt to an actor at `exposure`.
    pub fn damage_for(&self, exposure: u32) -> f64 {
        self.base_amount * (f64::from(exposure) / 100.0)
    }
}

impl Default for DamageConfig {
    fn default() -> Self {
        let effects = [
            ("25", vec!["HUNGER:0:10"]),
            ("50", vec!["WEAKNESS:0:10", "CONFUSION:0:5"]),
            ("75", vec!["POISON:0:5", "SLOW:1:10"]),
            ("90", vec!["WITHER:0:5"]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
        .collect();

        Self {
            enabled: true,
            interval: Self::DEFAULT_INTERVAL,
            threshold: Self::DEFAULT_THRESHOLD,
            base_amount: Self::DEFAULT_BASE_AMOUNT,
            effects,
        }
    }
}

/// One parsed entry of [`DamageConfig::effects`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectThreshold {
    pub threshold: u32,
    pub effects: Vec<String>,
}

/// Armour-based resistance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentConfig {
    pub enabled: bool,
    /// Checked in order; a worn item uses the first key contained in its
    /// material name.
    pub materials: Vec<MaterialResistance>,
}

impl EquipmentConfig {
    /// Summed resistance fraction for the worn material names.
    pub fn resistance_for<S: AsRef<str>>(&self, worn: &[S]) -> f64 {
        worn.iter()
            .filter_map(|material| {
                let material = material.as_ref();
                self.materials
                    .iter()
                    .find(|entry| material.contains(entry.key.as_str()))
                    .map(|entry| entry.percent / 100.0)
            })
            .sum()
    }
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        let materials = [
            ("LEATHER", 5.0),
            ("CHAINMAIL", 7.5),
            ("GOLDEN", 5.0),
            ("IRON", 10.0),
            ("DIAMOND", 15.0),
            ("NETHERITE", 20.0),
        ]
        .into_iter()
        .map(|(key, percent)| MaterialResistance {
            key: key.to_string(),
            percent,
        })
        .collect();

        Self {
            enabled: true,
            materials,
        }
    }
}

/// Resistance percentage granted by one armour material.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialResistance {
    pub key: String,
    pub percent: f64,
}

/// Resistance contributed by a third-party equipment system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntegrationConfig {
    pub enabled: bool,
}

/// Consumable items that act on exposure.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealingConfig {
    pub rad_away: RadAwayConfig,
    pub rad_x: RadXConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RadAwayConfig {
    /// Exposure removed per dose.
    pub amount: u32,
}

impl Default for RadAwayConfig {
    fn default() -> Self {
        Self { amount: 15 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RadXConfig {
    pub duration_seconds: u64,
    pub resistance_percent: f64,
}

impl RadXConfig {
    /// Resistance fraction while the buff is active.
    pub fn resistance(&self) -> f64 {
        self.resistance_percent / 100.0
    }
}

impl Default for RadXConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 600,
            resistance_percent: 50.0,
        }
    }
}

/// Cosmetic feedback settings forwarded to the presentation layer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectsConfig {
    pub particles: ParticlesConfig,
    pub sounds: SoundsConfig,
    pub indicator: IndicatorConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticlesConfig {
    pub enabled: bool,
    pub kind: String,
    /// Requests forwarded out of every 20.
    pub frequency: u32,
}

impl ParticlesConfig {
    pub const MAX_FREQUENCY: u32 = 20;
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: "REDSTONE".to_string(),
            frequency: 10,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoundsConfig {
    pub damage: SoundConfig,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoundConfig {
    pub enabled: bool,
    pub sound: String,
    pub volume: f32,
    pub pitch: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: "ENTITY_PLAYER_HURT".to_string(),
            volume: 0.8,
            pitch: 1.2,
        }
    }
}

/// Progress indicator (boss bar) shown while exposure is above zero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndicatorConfig {
    pub enabled: bool,
    /// `{level}` is replaced by the current exposure.
    pub title: String,
    pub color: String,
    pub style: String,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "&c☢ Radiation Level: {level}% ☢".to_string(),
            color: "RED".to_string(),
            style: "SOLID".to_string(),
        }
    }
}

/// Where persisted state lives.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StorageConfig {
    /// `json` or `bincode`.
    pub format: String,
    /// Overrides the platform data directory.
    pub directory: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            directory: None,
        }
    }
}
