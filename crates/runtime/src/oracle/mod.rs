//! Shared actor oracle the host updates while the worker reads it.
//!
//! The simulation worker only ever sees `&dyn ActorOracle`. [`RosterOracle`]
//! is the stock implementation: the host keeps a clone, pushes joins, moves
//! and equipment changes into it, and each tick reads a consistent snapshot.
use std::sync::{Arc, RwLock};

use rad_core::{ActorId, ActorOracle, ActorRoster, ActorView, Position};

/// Cloneable, lock-protected [`ActorRoster`].
#[derive(Clone, Debug, Default)]
pub struct RosterOracle {
    roster: Arc<RwLock<ActorRoster>>,
}

impl RosterOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roster(roster: ActorRoster) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
        }
    }

    /// Marks an actor online (or replaces its view). Returns `false` if the
    /// roster lock was poisoned.
    pub fn upsert(&self, view: ActorView) -> bool {
        self.with_roster(|roster| {
            roster.upsert(view);
        })
        .is_some()
    }

    /// Marks an actor offline.
    pub fn remove(&self, id: ActorId) -> Option<ActorView> {
        self.with_roster(|roster| roster.remove(id)).flatten()
    }

    /// Moves an online actor. Returns `false` if the actor is not online.
    pub fn move_actor(&self, id: ActorId, position: Position) -> bool {
        self.with_roster(|roster| match roster.get_mut(id) {
            Some(view) => {
                view.position = position;
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    /// Runs `f` with exclusive access to the roster.
    ///
    /// Returns `None` if a previous writer panicked while holding the lock.
    pub fn with_roster<R>(&self, f: impl FnOnce(&mut ActorRoster) -> R) -> Option<R> {
        match self.roster.write() {
            Ok(mut roster) => Some(f(&mut roster)),
            Err(_) => {
                tracing::error!("actor roster lock poisoned");
                None
            }
        }
    }
}

impl ActorOracle for RosterOracle {
    fn online_actors(&self) -> Vec<ActorId> {
        self.roster
            .read()
            .map(|roster| roster.online_actors())
            .unwrap_or_default()
    }

    fn actor(&self, id: ActorId) -> Option<ActorView> {
        self.roster.read().ok().and_then(|roster| roster.actor(id))
    }
}
