//! A single radiation source and its falloff function.
//!
//! The field level at a point depends only on the source snapshot and the
//! point, so repeated queries with the same inputs always agree.

use crate::state::{Position, SourceId};

/// Radiation emitter placed in the world.
///
/// Numeric attributes are clamped on construction and on every setter, so a
/// source can never hold an out-of-range radius, strength or power.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadiationSource {
    id: SourceId,
    name: String,
    position: Position,
    radius: u32,
    strength: u32,
    power: u32,
    active: bool,
}

impl RadiationSource {
    pub const MIN_RADIUS: u32 = 1;
    pub const MIN_STRENGTH: u32 = 1;
    pub const MAX_STRENGTH: u32 = 100;
    pub const MIN_POWER: u32 = 1;
    pub const MAX_POWER: u32 = 10;
    /// Power at which strength converts 1:1 into field level.
    pub const NEUTRAL_POWER: u32 = 5;
    /// Upper bound of any field level.
    pub const MAX_LEVEL: u32 = 100;

    /// Creates an active source, clamping every numeric parameter.
    pub fn new(
        id: SourceId,
        name: impl Into<String>,
        position: Position,
        radius: i64,
        strength: i64,
        power: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            radius: clamp_radius(radius),
            strength: clamp_strength(strength),
            power: clamp_power(power),
            active: true,
        }
    }

    /// Field level contributed at `point`, in `[0, 100]`.
    ///
    /// Zero when the source is inactive, in another world, or farther away than
    /// its radius. Inside the radius the level falls off linearly from
    /// `strength` at the centre to zero at the boundary, then scales by
    /// `power / 5`.
    pub fn level_at(&self, point: &Position) -> u32 {
        if !self.active {
            return 0;
        }
        let Some(distance) = self.position.distance_to(point) else {
            return 0;
        };
        let radius = f64::from(self.radius);
        if distance > radius {
            return 0;
        }

        let distance_ratio = 1.0 - (distance / radius);
        let raw_level = (f64::from(self.strength) * distance_ratio).floor();
        let level = (raw_level * self.power_factor()).floor();

        level.clamp(0.0, f64::from(Self::MAX_LEVEL)) as u32
    }

    /// Inclusion test used for "what is nearby" queries.
    ///
    /// Unlike [`level_at`](Self::level_at) this does not consider `active`,
    /// and a point exactly on the boundary is included.
    pub fn reaches(&self, point: &Position) -> bool {
        self.position
            .distance_to(point)
            .is_some_and(|distance| distance <= f64::from(self.radius))
    }

    /// Multiplier applied to the raw level; 1.0 at power 5.
    pub fn power_factor(&self) -> f64 {
        f64::from(self.power) / f64::from(Self::NEUTRAL_POWER)
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: i64) {
        self.radius = clamp_radius(radius);
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: i64) {
        self.strength = clamp_strength(strength);
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn set_power(&mut self, power: i64) {
        self.power = clamp_power(power);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

fn clamp_radius(radius: i64) -> u32 {
    radius.clamp(i64::from(RadiationSource::MIN_RADIUS), i64::from(u32::MAX)) as u32
}

fn clamp_strength(strength: i64) -> u32 {
    strength.clamp(
        i64::from(RadiationSource::MIN_STRENGTH),
        i64::from(RadiationSource::MAX_STRENGTH),
    ) as u32
}

fn clamp_power(power: i64) -> u32 {
    power.clamp(
        i64::from(RadiationSource::MIN_POWER),
        i64::from(RadiationSource::MAX_POWER),
    ) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(radius: i64, strength: i64, power: i64) -> RadiationSource {
        RadiationSource::new(
            SourceId(1),
            "reactor",
            Position::new("world", 0.0, 64.0, 0.0),
            radius,
            strength,
            power,
        )
    }

    fn at(distance: f64) -> Position {
        Position::new("world", distance, 64.0, 0.0)
    }

    #[test]
    fn halfway_to_the_edge_gives_half_strength() {
        let source = source(10, 80, 5);
        assert_eq!(source.level_at(&at(5.0)), 40);
    }

    #[test]
    fn boundary_contributes_nothing() {
        let source = source(10, 80, 5);
        assert_eq!(source.level_at(&at(10.0)), 0);
        assert!(source.reaches(&at(10.0)));
        assert!(!source.reaches(&at(10.01)));
    }

    #[test]
    fn centre_gives_full_strength() {
        assert_eq!(source(10, 80, 5).level_at(&at(0.0)), 80);
    }

    #[test]
    fn power_scales_after_flooring() {
        // raw = floor(80 * 0.75) = 60, scaled = floor(60 * 0.6) = 36
        assert_eq!(source(8, 80, 3).level_at(&at(2.0)), 36);
        // raw = 100, scaled = floor(100 * 2.0) = 200 -> clamped
        assert_eq!(source(8, 100, 10).level_at(&at(0.0)), 100);
    }

    #[test]
    fn inactive_or_other_world_is_zero() {
        let mut source = source(10, 80, 5);
        let elsewhere = Position::new("world_nether", 0.0, 64.0, 0.0);
        assert_eq!(source.level_at(&elsewhere), 0);

        source.set_active(false);
        assert_eq!(source.level_at(&at(0.0)), 0);
    }

    #[test]
    fn parameters_are_clamped_on_construction_and_mutation() {
        let mut source = source(-4, 500, 0);
        assert_eq!(source.radius(), 1);
        assert_eq!(source.strength(), 100);
        assert_eq!(source.power(), 1);

        source.set_radius(0);
        source.set_strength(-3);
        source.set_power(42);
        assert_eq!(source.radius(), 1);
        assert_eq!(source.strength(), 1);
        assert_eq!(source.power(), 10);
    }

    #[test]
    fn level_never_increases_moving_outward() {
        for &(radius, strength, power) in &[(10, 80, 5), (7, 100, 10), (25, 13, 2), (1, 1, 1)] {
            let source = source(radius, strength, power);
            let steps = 200;
            let mut previous = u32::MAX;
            for i in 0..=steps {
                let distance = radius as f64 * i as f64 / steps as f64;
                let level = source.level_at(&at(distance));
                assert!(level <= previous, "level rose at distance {distance}");
                assert!(level <= RadiationSource::MAX_LEVEL);
                previous = level;
            }
            assert_eq!(source.level_at(&at(radius as f64)), 0);
        }
    }
}
