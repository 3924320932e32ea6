//! Content factory rooted at a configuration directory.

use std::path::{Path, PathBuf};

use crate::DEFAULT_CONFIG_TOML;
use crate::loaders::{ConfigLoader, LoadResult, LoadedConfig};

/// Loads all simulator content from a configuration directory.
///
/// # Directory Structure
///
/// ```text
/// config_dir/
/// └── config.toml
/// ```
pub struct ContentFactory {
    config_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";

    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(Self::CONFIG_FILE)
    }

    /// Load configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<LoadedConfig> {
        ConfigLoader::load(&self.config_path())
    }

    /// Writes the bundled default `config.toml` if none exists yet.
    ///
    /// Returns true if a file was written.
    pub fn ensure_default_config(&self) -> LoadResult<bool> {
        let path = self.config_path();
        if path.exists() {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.config_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                self.config_dir.display(),
                e
            )
        })?;
        std::fs::write(&path, DEFAULT_CONFIG_TOML)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;

        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_written_once_and_loads_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path().join("nested"));

        assert!(factory.ensure_default_config().unwrap());
        assert!(!factory.ensure_default_config().unwrap());

        let loaded = factory.load_config().unwrap();
        assert!(loaded.problems.is_empty());
        assert_eq!(loaded.config.damage.interval, 60);
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        std::fs::write(factory.config_path(), "[damage]\nthreshold = 10\n").unwrap();

        assert!(!factory.ensure_default_config().unwrap());
        assert_eq!(factory.load_config().unwrap().config.damage.threshold, 10);
    }
}
