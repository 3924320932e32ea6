use std::collections::BTreeMap;

use crate::state::{ActorId, Position};

/// Snapshot of everything the exposure rules need to know about an actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorView {
    pub id: ActorId,
    pub position: Position,
    /// Bypass flag; exempt actors neither gain exposure nor tick.
    pub exempt: bool,
    /// Material names of worn armour pieces (e.g. `IRON_HELMET`).
    pub worn_materials: Vec<String>,
    /// Resistance fraction reported by a third-party equipment system.
    pub external_resistance: f64,
}

impl ActorView {
    pub fn new(id: ActorId, position: Position) -> Self {
        Self {
            id,
            position,
            exempt: false,
            worn_materials: Vec::new(),
            external_resistance: 0.0,
        }
    }

    pub fn with_exempt(mut self, exempt: bool) -> Self {
        self.exempt = exempt;
        self
    }

    pub fn with_worn_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.worn_materials = materials.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_external_resistance(mut self, resistance: f64) -> Self {
        self.external_resistance = resistance;
        self
    }
}

/// Source of actor data for the tick and for resistance queries.
pub trait ActorOracle: Send + Sync {
    /// Identities of every actor currently online, in a stable order.
    fn online_actors(&self) -> Vec<ActorId>;

    /// Current view of `id`, or `None` if the actor is offline or unknown.
    fn actor(&self, id: ActorId) -> Option<ActorView>;
}

/// Plain in-memory oracle keyed by actor identity.
#[derive(Clone, Debug, Default)]
pub struct ActorRoster {
    actors: BTreeMap<ActorId, ActorView>,
}

impl ActorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an actor, returning the previous view.
    pub fn upsert(&mut self, view: ActorView) -> Option<ActorView> {
        self.actors.insert(view.id, view)
    }

    pub fn remove(&mut self, id: ActorId) -> Option<ActorView> {
        self.actors.remove(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut ActorView> {
        self.actors.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl FromIterator<ActorView> for ActorRoster {
    fn from_iter<T: IntoIterator<Item = ActorView>>(iter: T) -> Self {
        Self {
            actors: iter.into_iter().map(|view| (view.id, view)).collect(),
        }
    }
}

impl ActorOracle for ActorRoster {
    fn online_actors(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    fn actor(&self, id: ActorId) -> Option<ActorView> {
        self.actors.get(&id).cloned()
    }
}
