//! Demo scenario: a few walkers crossing a pair of contaminated sites.
use anyhow::Result;
use tracing::info;

use rad_core::{ActorId, ActorView, Position};
use rad_runtime::{ConsumeOutcome, HealingItem, RosterOracle, RuntimeHandle};

pub const WORLD: &str = "wasteland";

/// Westmost and eastmost x coordinate a walker reaches before turning.
const BOUNDS: (f64, f64) = (-60.0, 60.0);

/// An actor pacing back and forth along the x axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Walker {
    pub id: ActorId,
    pub x: f64,
    pub z: f64,
    pub speed: f64,
}

impl Walker {
    pub fn position(&self) -> Position {
        Position::new(WORLD, self.x, 64.0, self.z)
    }

    /// Advance one step, bouncing off the bounds.
    pub fn step(&mut self) {
        let next = self.x + self.speed;
        let (min, max) = BOUNDS;
        if next > max {
            self.x = max - (next - max);
            self.speed = -self.speed;
        } else if next < min {
            self.x = min + (min - next);
            self.speed = -self.speed;
        } else {
            self.x = next;
        }
    }
}

/// Place the demo actors in the roster.
pub fn spawn_walkers(oracle: &RosterOracle) -> Vec<Walker> {
    let walkers = vec![
        Walker {
            id: ActorId(1),
            x: -50.0,
            z: 0.0,
            speed: 2.5,
        },
        Walker {
            id: ActorId(2),
            x: 40.0,
            z: 3.0,
            speed: -1.5,
        },
        Walker {
            id: ActorId(3),
            x: 0.0,
            z: -2.0,
            speed: 0.5,
        },
    ];

    for walker in &walkers {
        let mut view = ActorView::new(walker.id, walker.position());
        match walker.id {
            ActorId(2) => view = view.with_worn_materials(["IRON_HELMET", "LEATHER_BOOTS"]),
            ActorId(3) => view = view.with_worn_materials(["DIAMOND_CHESTPLATE"]),
            _ => {}
        }
        oracle.upsert(view);
    }

    walkers
}

/// Move every walker one step and publish the new positions.
pub fn step_walkers(oracle: &RosterOracle, walkers: &mut [Walker]) {
    for walker in walkers.iter_mut() {
        walker.step();
        oracle.move_actor(walker.id, walker.position());
    }
}

/// Create the demo sites unless saved sources were loaded.
pub async fn seed_sources(handle: &RuntimeHandle) -> Result<usize> {
    let existing = handle.sources().await?;
    if !existing.is_empty() {
        info!("Using {} saved radiation sources", existing.len());
        return Ok(0);
    }

    handle
        .create_source("Crater", Position::new(WORLD, 0.0, 64.0, 0.0), 30, 80, 6)
        .await?;
    handle
        .create_source("Spill", Position::new(WORLD, 35.0, 64.0, 2.0), 10, 100, 10)
        .await?;

    info!("Created 2 demo radiation sources");
    Ok(2)
}

/// Actor 2 carries Rad-X into the field.
pub async fn pre_dose(handle: &RuntimeHandle) -> Result<()> {
    if let ConsumeOutcome::Shielded { expiry } =
        handle.consume(ActorId(2), HealingItem::RadX).await?
    {
        info!(actor = %ActorId(2), %expiry, "took Rad-X");
    }
    Ok(())
}

/// Anyone above `threshold` takes a RadAway.
pub async fn treat(handle: &RuntimeHandle, walkers: &[Walker], threshold: u32) -> Result<()> {
    for walker in walkers {
        if handle.exposure(walker.id).await? <= threshold {
            continue;
        }
        if let ConsumeOutcome::Cleansed { removed, level } =
            handle.consume(walker.id, HealingItem::RadAway).await?
        {
            info!(actor = %walker.id, removed, level, "took RadAway");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkers_bounce_off_bounds() {
        let mut walker = Walker {
            id: ActorId(9),
            x: 59.0,
            z: 0.0,
            speed: 3.0,
        };

        walker.step();
        assert_eq!(walker.x, 58.0);
        assert_eq!(walker.speed, -3.0);

        walker.x = -59.0;
        walker.step();
        assert_eq!(walker.x, -58.0);
        assert_eq!(walker.speed, 3.0);

        walker.step();
        assert_eq!(walker.x, -55.0);
    }

    #[test]
    fn spawned_walkers_are_visible_to_the_oracle() {
        let oracle = RosterOracle::new();
        let mut walkers = spawn_walkers(&oracle);
        assert_eq!(walkers.len(), 3);

        step_walkers(&oracle, &mut walkers);
        let position = oracle
            .with_roster(|roster| roster.get_mut(ActorId(1)).map(|view| view.position.clone()))
            .flatten();
        assert_eq!(position, Some(walkers[0].position()));
    }
}
