//! Owned collection of radiation sources and field aggregation.

use std::collections::BTreeMap;

use crate::snapshot::SourceStore;
use crate::source::RadiationSource;
use crate::state::{Position, SourceId};

/// Holds every known source, keyed by identity.
///
/// Sources are handed out by shared reference only; mutation goes through
/// [`update`](Self::update) so the setters' clamps always apply. Iteration
/// order is identity order, which makes name lookups deterministic when
/// duplicate names exist (the oldest source wins).
#[derive(Clone, Debug)]
pub struct SourceRegistry {
    sources: BTreeMap<SourceId, RadiationSource>,
    next_id: u64,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a registry from persisted records.
    ///
    /// The identity counter resumes after both the stored counter and the
    /// highest loaded id, so identities are never handed out twice.
    pub fn from_store(store: SourceStore) -> Self {
        let mut registry = Self::new();
        registry.next_id = store.next_id.max(1);
        for record in store.sources {
            let source = record.into_source();
            registry.next_id = registry.next_id.max(source.id().0 + 1);
            registry.sources.insert(source.id(), source);
        }
        registry
    }

    /// Captures the registry in its persisted shape.
    pub fn to_store(&self) -> SourceStore {
        SourceStore {
            next_id: self.next_id,
            sources: self.sources.values().map(Into::into).collect(),
        }
    }

    /// Creates and stores a new active source.
    ///
    /// Parameters are clamped; name uniqueness is the caller's concern.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        position: Position,
        radius: i64,
        strength: i64,
        power: i64,
    ) -> &RadiationSource {
        let id = SourceId(self.next_id);
        self.next_id += 1;

        let source = RadiationSource::new(id, name, position, radius, strength, power);
        self.sources.entry(id).or_insert(source)
    }

    pub fn by_id(&self, id: SourceId) -> Option<&RadiationSource> {
        self.sources.get(&id)
    }

    /// Case-insensitive exact name match; the lowest identity wins.
    pub fn by_name(&self, name: &str) -> Option<&RadiationSource> {
        let wanted = name.to_lowercase();
        self.sources
            .values()
            .find(|source| source.name().to_lowercase() == wanted)
    }

    /// Applies `change` to the source with `id`.
    ///
    /// Returns the updated source, or `None` if it does not exist.
    pub fn update<F>(&mut self, id: SourceId, change: F) -> Option<&RadiationSource>
    where
        F: FnOnce(&mut RadiationSource),
    {
        let source = self.sources.get_mut(&id)?;
        change(source);
        Some(source)
    }

    pub fn remove(&mut self, id: SourceId) -> bool {
        self.sources.remove(&id).is_some()
    }

    pub fn remove_by_name(&mut self, name: &str) -> bool {
        match self.by_name(name).map(RadiationSource::id) {
            Some(id) => self.remove(id),
            None => false,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &RadiationSource> + '_ {
        self.sources.values()
    }

    pub fn active(&self) -> impl Iterator<Item = &RadiationSource> + '_ {
        self.sources.values().filter(|source| source.is_active())
    }

    /// Active sources in the point's world whose radius contains the point.
    pub fn near_position(&self, point: &Position) -> Vec<&RadiationSource> {
        self.active()
            .filter(|source| source.reaches(point))
            .collect()
    }

    /// Field level at `point`: the strongest contribution among nearby sources.
    ///
    /// Overlapping sources do not stack.
    pub fn level_at(&self, point: &Position) -> u32 {
        self.near_position(point)
            .into_iter()
            .map(|source| source.level_at(point))
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Identity the next created source will receive.
    pub fn next_id(&self) -> SourceId {
        SourceId(self.next_id)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Position {
        Position::new("world", 0.0, 0.0, 0.0)
    }

    fn point(x: f64) -> Position {
        Position::new("world", x, 0.0, 0.0)
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let mut registry = SourceRegistry::new();
        let a = registry.create("a", origin(), 5, 50, 5).id();
        let b = registry.create("b", origin(), 5, 50, 5).id();
        assert!(b > a);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry = SourceRegistry::new();
        let first = registry.create("a", origin(), 5, 50, 5).id();
        assert!(registry.remove(first));

        let second = registry.create("b", origin(), 5, 50, 5).id();
        assert_ne!(first, second);

        let restored = SourceRegistry::from_store(registry.to_store());
        assert_eq!(restored.next_id(), registry.next_id());
    }

    #[test]
    fn name_lookup_ignores_case_and_prefers_oldest() {
        let mut registry = SourceRegistry::new();
        let oldest = registry.create("Chernobyl", origin(), 5, 50, 5).id();
        registry.create("chernobyl", point(100.0), 5, 50, 5);

        assert_eq!(registry.by_name("CHERNOBYL").map(|s| s.id()), Some(oldest));
        assert!(registry.by_name("pripyat").is_none());
    }

    #[test]
    fn remove_by_name_reports_outcome() {
        let mut registry = SourceRegistry::new();
        registry.create("vault", origin(), 5, 50, 5);
        assert!(registry.remove_by_name("VAULT"));
        assert!(!registry.remove_by_name("vault"));
        assert!(registry.is_empty());
    }

    #[test]
    fn overlapping_sources_take_the_maximum() {
        let mut registry = SourceRegistry::new();
        // Both reach x = 5: 80 * 0.5 = 40 and 70 * 0.8 = 56
        registry.create("weak", origin(), 10, 80, 5);
        registry.create("strong", point(-5.0), 50, 70, 5);
        let target = point(5.0);

        let levels: Vec<u32> = registry
            .near_position(&target)
            .iter()
            .map(|s| s.level_at(&target))
            .collect();
        assert_eq!(levels.len(), 2);
        assert!(levels.contains(&40));

        let strongest = *levels.iter().max().unwrap();
        assert_eq!(registry.level_at(&target), strongest);
        assert!(registry.level_at(&target) < levels.iter().sum::<u32>());
    }

    #[test]
    fn max_of_forty_and_seventy_is_seventy() {
        let mut registry = SourceRegistry::new();
        registry.create("forty", origin(), 10, 80, 5);
        registry.create("seventy", point(5.0), 10, 70, 5);
        // At x = 5: first source yields 40, second sits on top of the point.
        assert_eq!(registry.level_at(&point(5.0)), 70);
    }

    #[test]
    fn inactive_and_foreign_sources_are_not_near() {
        let mut registry = SourceRegistry::new();
        let id = registry.create("off", origin(), 10, 80, 5).id();
        registry.create("nether", Position::new("nether", 0.0, 0.0, 0.0), 10, 80, 5);
        registry.update(id, |s| s.set_active(false));

        assert!(registry.near_position(&origin()).is_empty());
        assert_eq!(registry.level_at(&origin()), 0);
        assert_eq!(registry.active().count(), 1);
        assert_eq!(registry.all().count(), 2);
    }

    #[test]
    fn update_reapplies_clamps() {
        let mut registry = SourceRegistry::new();
        let id = registry.create("a", origin(), 5, 50, 5).id();
        let updated = registry
            .update(id, |s| {
                s.set_strength(1_000);
                s.set_name("renamed");
            })
            .unwrap();
        assert_eq!(updated.strength(), 100);
        assert!(registry.by_name("renamed").is_some());
        assert!(registry.update(SourceId(999), |_| {}).is_none());
    }
}
