//! Fixed vocabularies for the cosmetic and gameplay feedback the rules request.
//!
//! Configuration stores effect, particle, colour and sound names as plain
//! strings. They are parsed against the enums here when used; a name that does
//! not parse means "not applied", never a failed tick.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Engine ticks per second of game time, used to convert effect durations.
pub const TICKS_PER_SECOND: u32 = 20;

/// Failure to interpret a configured effect or sound.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EffectParseError {
    #[error("invalid effect format `{0}`: expected KIND:AMPLIFIER:SECONDS")]
    WrongArity(String),

    #[error("unknown status effect `{0}`")]
    UnknownKind(String),

    #[error("invalid number in effect `{0}`")]
    InvalidNumber(String),

    #[error("invalid sound `{0}`")]
    InvalidSound(String),
}

/// Status effects a threshold may apply.
///
/// Parsing accepts the current names and the legacy aliases still found in
/// older configuration files (`SLOW`, `CONFUSION`, `HARM`, ...).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StatusEffectKind {
    Speed,
    #[strum(to_string = "SLOWNESS", serialize = "SLOW")]
    Slowness,
    #[strum(to_string = "HASTE", serialize = "FAST_DIGGING")]
    Haste,
    #[strum(to_string = "MINING_FATIGUE", serialize = "SLOW_DIGGING")]
    MiningFatigue,
    #[strum(to_string = "STRENGTH", serialize = "INCREASE_DAMAGE")]
    Strength,
    #[strum(to_string = "INSTANT_HEALTH", serialize = "HEAL")]
    InstantHealth,
    #[strum(to_string = "INSTANT_DAMAGE", serialize = "HARM")]
    InstantDamage,
    #[strum(to_string = "JUMP_BOOST", serialize = "JUMP")]
    JumpBoost,
    #[strum(to_string = "NAUSEA", serialize = "CONFUSION")]
    Nausea,
    Regeneration,
    #[strum(to_string = "RESISTANCE", serialize = "DAMAGE_RESISTANCE")]
    Resistance,
    FireResistance,
    WaterBreathing,
    Invisibility,
    Blindness,
    NightVision,
    Hunger,
    Weakness,
    Poison,
    Wither,
    HealthBoost,
    Absorption,
    Saturation,
    Glowing,
    Levitation,
    Luck,
    #[strum(to_string = "UNLUCK", serialize = "BAD_LUCK")]
    Unluck,
    SlowFalling,
    Darkness,
}

/// A parsed `KIND:AMPLIFIER:SECONDS` entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub amplifier: u32,
    pub duration_ticks: u32,
}

impl StatusEffect {
    pub fn duration_seconds(&self) -> u32 {
        self.duration_ticks / TICKS_PER_SECOND
    }
}

impl FromStr for StatusEffect {
    type Err = EffectParseError;

    /// Extra `:`-separated fields after the third are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() < 3 {
            return Err(EffectParseError::WrongArity(s.to_string()));
        }

        let kind = StatusEffectKind::from_str(parts[0])
            .map_err(|_| EffectParseError::UnknownKind(parts[0].to_string()))?;
        let amplifier = parts[1]
            .parse::<u32>()
            .map_err(|_| EffectParseError::InvalidNumber(s.to_string()))?;
        let seconds = parts[2]
            .parse::<u32>()
            .map_err(|_| EffectParseError::InvalidNumber(s.to_string()))?;

        Ok(Self {
            kind,
            amplifier,
            duration_ticks: seconds.saturating_mul(TICKS_PER_SECOND),
        })
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind,
            self.amplifier,
            self.duration_seconds()
        )
    }
}

/// Cosmetic particles shown around an exposed actor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticleKind {
    #[strum(to_string = "REDSTONE", serialize = "DUST")]
    Redstone,
    SmokeNormal,
    SmokeLarge,
    SpellMob,
    SpellWitch,
    Crit,
    Flame,
    SoulFireFlame,
    Ash,
    WhiteAsh,
    Cloud,
    Portal,
    Slime,
    EndRod,
    VillagerAngry,
    DrippingObsidianTear,
    SporeBlossomAir,
}

impl ParticleKind {
    /// Particles spawned per forwarded request.
    pub const BURST: u32 = 3;
}

/// Progress indicator colour.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorColor {
    Pink,
    Blue,
    #[default]
    Red,
    Green,
    Yellow,
    Purple,
    White,
}

/// Progress indicator segmentation.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorStyle {
    #[default]
    Solid,
    #[strum(to_string = "SEGMENTED_6")]
    Segmented6,
    #[strum(to_string = "SEGMENTED_10")]
    Segmented10,
    #[strum(to_string = "SEGMENTED_12")]
    Segmented12,
    #[strum(to_string = "SEGMENTED_20")]
    Segmented20,
}

/// Sound played alongside periodic damage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundCue {
    pub sound: String,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundCue {
    /// Validates a sound key and its playback parameters.
    ///
    /// Keys are namespaced identifiers (`ENTITY_PLAYER_HURT`,
    /// `minecraft:entity.player.hurt`); whitespace or an empty key is rejected,
    /// as are non-finite or negative volume and pitch.
    pub fn parse(sound: &str, volume: f32, pitch: f32) -> Result<Self, EffectParseError> {
        let sound = sound.trim();
        let valid_key = !sound.is_empty()
            && sound
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '/' | '-'));
        let valid_params = volume.is_finite() && volume >= 0.0 && pitch.is_finite() && pitch >= 0.0;

        if !valid_key || !valid_params {
            return Err(EffectParseError::InvalidSound(sound.to_string()));
        }

        Ok(Self {
            sound: sound.to_string(),
            volume,
            pitch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_effect_and_converts_seconds_to_ticks() {
        let effect: StatusEffect = "WEAKNESS:0:10".parse().unwrap();
        assert_eq!(effect.kind, StatusEffectKind::Weakness);
        assert_eq!(effect.amplifier, 0);
        assert_eq!(effect.duration_ticks, 200);
        assert_eq!(effect.to_string(), "WEAKNESS:0:10");
    }

    #[test]
    fn legacy_aliases_resolve_to_current_kinds() {
        assert_eq!(
            "SLOW".parse::<StatusEffectKind>().unwrap(),
            StatusEffectKind::Slowness
        );
        assert_eq!(
            "confusion".parse::<StatusEffectKind>().unwrap(),
            StatusEffectKind::Nausea
        );
        assert_eq!(StatusEffectKind::Nausea.to_string(), "NAUSEA");
    }

    #[test]
    fn malformed_effects_are_reported() {
        assert_eq!(
            "POISON:1".parse::<StatusEffect>(),
            Err(EffectParseError::WrongArity("POISON:1".into()))
        );
        assert_eq!(
            "RADIANCE:0:5".parse::<StatusEffect>(),
            Err(EffectParseError::UnknownKind("RADIANCE".into()))
        );
        assert_eq!(
            "POISON:x:5".parse::<StatusEffect>(),
            Err(EffectParseError::InvalidNumber("POISON:x:5".into()))
        );
        assert!("POISON:0:-5".parse::<StatusEffect>().is_err());
    }

    #[test]
    fn every_kind_round_trips_through_its_name() {
        use strum::IntoEnumIterator;
        for kind in StatusEffectKind::iter() {
            assert_eq!(kind.as_ref().parse::<StatusEffectKind>(), Ok(kind));
        }
    }

    #[test]
    fn particle_and_indicator_names_are_case_sensitive() {
        assert_eq!("REDSTONE".parse(), Ok(ParticleKind::Redstone));
        assert_eq!("DUST".parse(), Ok(ParticleKind::Redstone));
        assert!("redstone".parse::<ParticleKind>().is_err());
        assert_eq!("SEGMENTED_10".parse(), Ok(IndicatorStyle::Segmented10));
        assert!("CRIMSON".parse::<IndicatorColor>().is_err());
    }

    #[test]
    fn sound_cue_validation() {
        let cue = SoundCue::parse("ENTITY_PLAYER_HURT", 0.8, 1.2).unwrap();
        assert_eq!(cue.sound, "ENTITY_PLAYER_HURT");
        assert!(SoundCue::parse("", 1.0, 1.0).is_err());
        assert!(SoundCue::parse("not a sound", 1.0, 1.0).is_err());
        assert!(SoundCue::parse("BLOCK_ANVIL_LAND", f32::NAN, 1.0).is_err());
    }
}
