//! In-memory StateRepository implementation for tests and local runs.

use std::sync::RwLock;

use rad_core::{ExposureEntry, SourceStore};

use crate::repository::{RepositoryError, Result, StateRepository};

/// In-memory implementation of StateRepository.
#[derive(Debug, Default)]
pub struct InMemoryStateRepo {
    sources: RwLock<Option<SourceStore>>,
    exposures: RwLock<Vec<ExposureEntry>>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-seeded state, as if it had been saved earlier.
    pub fn with_state(sources: SourceStore, exposures: Vec<ExposureEntry>) -> Self {
        Self {
            sources: RwLock::new(Some(sources)),
            exposures: RwLock::new(exposures),
        }
    }
}

impl StateRepository for InMemoryStateRepo {
    fn load_sources(&self) -> Result<Option<SourceStore>> {
        let sources = self
            .sources
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sources.clone())
    }

    fn save_sources(&self, store: &SourceStore) -> Result<()> {
        let mut sources = self
            .sources
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *sources = Some(store.clone());
        Ok(())
    }

    fn load_exposures(&self) -> Result<Vec<ExposureEntry>> {
        let exposures = self
            .exposures
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(exposures.clone())
    }

    fn save_exposures(&self, entries: &[ExposureEntry]) -> Result<()> {
        let mut exposures = self
            .exposures
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *exposures = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::{ActorId, SourceRecord, Timestamp};

    fn record(id: u64, name: &str) -> SourceRecord {
        SourceRecord {
            id,
            name: name.to_string(),
            world: "world".to_string(),
            x: 0.0,
            y: 64.0,
            z: 0.0,
            radius: 10,
            strength: 50,
            power: 5,
            active: true,
        }
    }

    #[test]
    fn empty_repository_has_nothing_saved() {
        let repo = InMemoryStateRepo::new();
        assert_eq!(repo.load_sources().unwrap(), None);
        assert!(repo.load_exposures().unwrap().is_empty());
    }

    #[test]
    fn saves_replace_previous_contents() {
        let seeded = SourceStore {
            next_id: 3,
            sources: vec![record(1, "Old"), record(2, "Older")],
        };
        let exposures = vec![ExposureEntry {
            actor: ActorId(1),
            level: 30,
            buff_expiry: Some(Timestamp(9_000)),
        }];
        let repo = InMemoryStateRepo::with_state(seeded, exposures);

        let replacement = SourceStore {
            next_id: 4,
            sources: vec![record(3, "New")],
        };
        repo.save_sources(&replacement).unwrap();
        repo.save_exposures(&[]).unwrap();

        assert_eq!(repo.load_sources().unwrap(), Some(replacement));
        assert!(repo.load_exposures().unwrap().is_empty());
    }
}
