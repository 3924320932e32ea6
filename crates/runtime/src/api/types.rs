//! Request and reply types for [`RuntimeHandle`](super::RuntimeHandle).

use rad_core::{Position, RadiationSource, Timestamp};
use serde::{Deserialize, Serialize};

/// Partial change to a source. Unset fields are left alone; numeric fields
/// go through the same clamps as creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceUpdate {
    pub name: Option<String>,
    pub position: Option<Position>,
    pub radius: Option<i64>,
    pub strength: Option<i64>,
    pub power: Option<i64>,
    pub active: Option<bool>,
}

impl SourceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn radius(mut self, radius: i64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn strength(mut self, strength: i64) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn power(mut self, power: i64) -> Self {
        self.power = Some(power);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, source: &mut RadiationSource) {
        if let Some(name) = self.name {
            source.set_name(name);
        }
        if let Some(position) = self.position {
            source.set_position(position);
        }
        if let Some(radius) = self.radius {
            source.set_radius(radius);
        }
        if let Some(strength) = self.strength {
            source.set_strength(strength);
        }
        if let Some(power) = self.power {
            source.set_power(power);
        }
        if let Some(active) = self.active {
            source.set_active(active);
        }
    }
}

/// Consumables that act on exposure.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum HealingItem {
    /// Removes a fixed amount of exposure, ignoring resistance.
    RadAway,
    /// Grants the timed resistance buff.
    RadX,
}

/// Result of consuming a [`HealingItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeOutcome {
    Cleansed { removed: u32, level: u32 },
    Shielded { expiry: Timestamp },
}

/// Result of a configuration reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadSummary {
    /// Sources in the registry after the reload.
    pub sources: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::SourceId;

    #[test]
    fn update_applies_only_set_fields_with_clamping() {
        let mut source = RadiationSource::new(
            SourceId(1),
            "vent",
            Position::new("world", 0.0, 0.0, 0.0),
            10,
            50,
            5,
        );

        SourceUpdate::new()
            .radius(0)
            .strength(-3)
            .active(false)
            .apply(&mut source);

        assert_eq!(source.name(), "vent");
        assert_eq!(source.radius(), 1);
        assert_eq!(source.strength(), 1);
        assert_eq!(source.power(), 5);
        assert!(!source.is_active());
        assert!(SourceUpdate::new().is_empty());
    }

    #[test]
    fn healing_items_parse_from_item_names() {
        assert_eq!("rad-away".parse::<HealingItem>().unwrap(), HealingItem::RadAway);
        assert_eq!("RAD-X".parse::<HealingItem>().unwrap(), HealingItem::RadX);
        assert_eq!(HealingItem::RadX.to_string(), "rad-x");
        assert!("stimpak".parse::<HealingItem>().is_err());
    }
}
