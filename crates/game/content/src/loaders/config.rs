//! Exposure configuration loader.

use std::path::Path;

use rad_core::{ConfigError, ExposureConfig};
use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_optional_file};

/// Configuration together with every problem corrected while loading it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedConfig {
    pub config: ExposureConfig,
    pub problems: Vec<ConfigError>,
}

/// Loader for exposure configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Top-level sections understood by [`ExposureConfig`].
    pub const SECTIONS: [&'static str; 9] = [
        "general",
        "sources",
        "exposure",
        "damage",
        "equipment",
        "integration",
        "healing",
        "effects",
        "storage",
    ];

    /// Load config from a TOML file, logging every corrected problem.
    ///
    /// A missing file yields the defaults. Only unreadable files and TOML
    /// syntax errors are returned as errors.
    pub fn load(path: &Path) -> LoadResult<LoadedConfig> {
        let Some(content) = read_optional_file(path)? else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(LoadedConfig::default());
        };

        let loaded = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;

        for problem in &loaded.problems {
            tracing::warn!(path = %path.display(), "{problem}");
        }
        tracing::info!(
            path = %path.display(),
            problems = loaded.problems.len(),
            "loaded configuration"
        );

        Ok(loaded)
    }

    /// Parse config TOML, deserializing each top-level section on its own.
    pub fn parse(content: &str) -> LoadResult<LoadedConfig> {
        let mut table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        let mut problems = Vec::new();

        let mut config = ExposureConfig {
            general: section(&mut table, "general", &mut problems),
            sources: section(&mut table, "sources", &mut problems),
            exposure: section(&mut table, "exposure", &mut problems),
            damage: section(&mut table, "damage", &mut problems),
            equipment: section(&mut table, "equipment", &mut problems),
            integration: section(&mut table, "integration", &mut problems),
            healing: section(&mut table, "healing", &mut problems),
            effects: section(&mut table, "effects", &mut problems),
            storage: section(&mut table, "storage", &mut problems),
        };

        for unknown in table.keys() {
            problems.push(ConfigError::InvalidSection {
                section: unknown.clone(),
                reason: "unknown section".to_string(),
            });
        }

        problems.extend(config.sanitize());
        let (_, threshold_problems) = config.damage.effect_thresholds();
        problems.extend(threshold_problems);

        Ok(LoadedConfig { config, problems })
    }
}

fn section<T>(table: &mut toml::Table, name: &str, problems: &mut Vec<ConfigError>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = table.remove(name) else {
        return T::default();
    };

    value.try_into::<T>().unwrap_or_else(|e| {
        problems.push(ConfigError::InvalidSection {
            section: name.to_string(),
            reason: e.to_string().trim().to_string(),
        });
        T::default()
    })
}
