//! Content loaders for reading configuration from files.

pub mod config;
pub mod factory;

pub use config::{ConfigLoader, LoadedConfig};
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a file, returning `None` when it does not exist.
pub(crate) fn read_optional_file(path: &Path) -> LoadResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to read file {}: {}",
            path.display(),
            e
        )),
    }
}
