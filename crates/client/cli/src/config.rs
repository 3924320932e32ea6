//! Simulator configuration read from the process environment.
use std::env;
use std::path::{Path, PathBuf};

use rad_core::StorageConfig;

const APPLICATION: &str = "rad-sim";

/// Settings that decide where the simulator reads and writes, and how long
/// it runs. Exposure rules themselves come from `config.toml`.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub config_dir: PathBuf,
    /// Explicit data directory; overrides `storage.directory` when set.
    pub data_dir: Option<PathBuf>,
    pub log_dir: PathBuf,
    pub ticks: u64,
    pub realtime: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            data_dir: None,
            log_dir: default_log_dir(),
            ticks: 200,
            realtime: false,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RAD_CONFIG_DIR` - Directory holding `config.toml` (default: platform-specific)
    /// - `RAD_DATA_DIR` - Directory for saved sources and exposure (default: `storage.directory`, then platform-specific)
    /// - `RAD_LOG_DIR` - Directory for the log file (default: platform cache dir)
    /// - `RAD_SIM_TICKS` - Exposure checks to run before exiting (default: 200)
    /// - `RAD_SIM_REALTIME` - Drive checks from the periodic timer instead of stepping (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RAD_CONFIG_DIR") {
            config.config_dir = PathBuf::from(dir);
        }

        config.data_dir = env::var("RAD_DATA_DIR").ok().map(PathBuf::from);

        if let Ok(dir) = env::var("RAD_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        if let Some(ticks) = read_env::<u64>("RAD_SIM_TICKS") {
            config.ticks = ticks;
        }

        if let Some(realtime) = read_env::<bool>("RAD_SIM_REALTIME") {
            config.realtime = realtime;
        } else if env::var("RAD_SIM_REALTIME").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.realtime = true;
        }

        config
    }

    /// Data directory, in order of precedence: environment, the storage
    /// section of `config.toml`, then the platform data directory.
    pub fn resolve_data_dir(&self, storage: &StorageConfig) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }

        match storage.directory.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => relative_to(&self.config_dir, dir),
            _ => default_data_dir(),
        }
    }
}

/// Relative storage directories are resolved against the config directory.
fn relative_to(base: &Path, dir: &str) -> PathBuf {
    let path = Path::new(dir);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APPLICATION)
}

fn default_config_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./config"))
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

fn default_log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/rad-sim/logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(directory: Option<&str>) -> StorageConfig {
        StorageConfig {
            directory: directory.map(str::to_string),
            ..StorageConfig::default()
        }
    }

    fn config(data_dir: Option<&str>) -> SimConfig {
        SimConfig {
            config_dir: PathBuf::from("/etc/rad"),
            data_dir: data_dir.map(PathBuf::from),
            log_dir: PathBuf::from("/tmp/logs"),
            ticks: 1,
            realtime: false,
        }
    }

    #[test]
    fn environment_override_wins() {
        let resolved = config(Some("/srv/rad")).resolve_data_dir(&storage(Some("/var/rad")));
        assert_eq!(resolved, PathBuf::from("/srv/rad"));
    }

    #[test]
    fn storage_directory_is_relative_to_config_dir() {
        let sim = config(None);
        assert_eq!(
            sim.resolve_data_dir(&storage(Some("data"))),
            PathBuf::from("/etc/rad/data")
        );
        assert_eq!(
            sim.resolve_data_dir(&storage(Some("/var/rad"))),
            PathBuf::from("/var/rad")
        );
    }

    #[test]
    fn blank_storage_directory_uses_platform_default() {
        let sim = config(None);
        assert_eq!(sim.resolve_data_dir(&storage(Some("  "))), default_data_dir());
        assert_eq!(sim.resolve_data_dir(&storage(None)), default_data_dir());
    }
}
