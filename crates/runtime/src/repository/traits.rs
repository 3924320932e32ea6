//! Repository contract for saving and loading persisted state.

use rad_core::{ExposureEntry, SourceStore};

use crate::repository::Result;

/// Storage for sources and exposure records.
///
/// Called only at startup, on explicit save or reload, and at shutdown;
/// never from inside a tick.
pub trait StateRepository: Send + Sync {
    /// Load every persisted source, or `None` if nothing was ever saved.
    fn load_sources(&self) -> Result<Option<SourceStore>>;

    /// Replace the persisted sources.
    fn save_sources(&self, store: &SourceStore) -> Result<()>;

    /// Load every persisted exposure record.
    fn load_exposures(&self) -> Result<Vec<ExposureEntry>>;

    /// Replace the persisted exposure records.
    fn save_exposures(&self, entries: &[ExposureEntry]) -> Result<()>;
}
