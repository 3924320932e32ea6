//! Flat record shapes used to persist sources and exposure.
//!
//! These are format-agnostic; the runtime decides whether they become JSON or
//! bincode. Records hold primitives only so a stored file stays readable even
//! if the in-memory types change shape.

use crate::source::RadiationSource;
use crate::state::{ActorId, Position, SourceId, Timestamp};

/// One persisted radiation source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRecord {
    pub id: u64,
    pub name: String,
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: i64,
    pub strength: i64,
    pub power: i64,
    pub active: bool,
}

impl SourceRecord {
    /// Rebuilds the source, re-applying the usual clamps to stored values.
    pub fn into_source(self) -> RadiationSource {
        let position = Position::new(self.world, self.x, self.y, self.z);
        let mut source = RadiationSource::new(
            SourceId(self.id),
            self.name,
            position,
            self.radius,
            self.strength,
            self.power,
        );
        source.set_active(self.active);
        source
    }
}

impl From<&RadiationSource> for SourceRecord {
    fn from(source: &RadiationSource) -> Self {
        let position = source.position();
        Self {
            id: source.id().0,
            name: source.name().to_string(),
            world: position.world.as_str().to_string(),
            x: position.x,
            y: position.y,
            z: position.z,
            radius: i64::from(source.radius()),
            strength: i64::from(source.strength()),
            power: i64::from(source.power()),
            active: source.is_active(),
        }
    }
}

/// Every persisted source plus the identity counter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceStore {
    pub next_id: u64,
    pub sources: Vec<SourceRecord>,
}

/// One persisted actor exposure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExposureEntry {
    pub actor: ActorId,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buff_expiry: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_survives_record_round_trip() {
        let mut original = RadiationSource::new(
            SourceId(7),
            "Reactor 4",
            Position::new("zone", 12.5, 64.0, -3.25),
            24,
            90,
            7,
        );
        original.set_active(false);

        let rebuilt = SourceRecord::from(&original).into_source();

        assert_eq!(rebuilt, original);
    }

    #[test]
    fn tampered_records_are_clamped_on_load() {
        let record = SourceRecord {
            id: 3,
            name: "hot".into(),
            world: "world".into(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: -1,
            strength: 9_000,
            power: 0,
            active: true,
        };
        let source = record.into_source();
        assert_eq!(source.radius(), 1);
        assert_eq!(source.strength(), 100);
        assert_eq!(source.power(), 1);
    }
}
