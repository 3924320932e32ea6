//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use rad_core::{ExposureEntry, SourceRecord, SourceStore};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::repository::{RepositoryError, Result, StateRepository};

/// On-disk encoding for persisted state.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StorageFormat {
    /// Human-readable; a damaged record is skipped instead of failing the load.
    #[default]
    Json,
    /// Compact; the file loads whole or not at all.
    Bincode,
}

impl StorageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Bincode => "bin",
        }
    }

    /// Parses a configured format name, falling back to JSON with a warning.
    pub fn from_config(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(format = value, "unknown storage format, using json");
            Self::default()
        })
    }
}

/// File-based implementation of StateRepository.
///
/// # File Format
///
/// Two files live in the base directory:
/// - `sources.{json|bin}`: the identity counter and every source record
/// - `exposure.{json|bin}`: per-actor exposure records
///
/// Writes go to a temporary file first and are moved into place with an
/// atomic rename, so a crash mid-save leaves the previous file intact.
pub struct FileStateRepository {
    base_dir: PathBuf,
    format: StorageFormat,
}

/// JSON shape read before individual records are validated.
#[derive(Deserialize)]
struct RawSourceStore {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    sources: Vec<serde_json::Value>,
}

impl FileStateRepository {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>, format: StorageFormat) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir, format })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    pub fn sources_path(&self) -> PathBuf {
        self.base_dir
            .join(format!("sources.{}", self.format.extension()))
    }

    pub fn exposures_path(&self) -> PathBuf {
        self.base_dir
            .join(format!("exposure.{}", self.format.extension()))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = path.with_extension(format!("{}.tmp", self.format.extension()));

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, path).map_err(RepositoryError::Io)?;

        Ok(())
    }

    fn encode<T: serde::Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self.format {
            StorageFormat::Json => {
                serde_json::to_vec_pretty(value).map_err(|e| RepositoryError::Json(e.to_string()))
            }
            StorageFormat::Bincode => bincode::serialize(value)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
        }
    }

    fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }
}

/// Decodes JSON records one by one, skipping the ones that do not fit.
fn decode_records<T: DeserializeOwned>(values: Vec<serde_json::Value>, file: &Path) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    file = %file.display(),
                    index,
                    error = %e,
                    "skipping invalid record"
                );
                None
            }
        })
        .collect()
}

impl StateRepository for FileStateRepository {
    fn load_sources(&self) -> Result<Option<SourceStore>> {
        let path = self.sources_path();
        let Some(bytes) = Self::read_existing(&path)? else {
            return Ok(None);
        };

        let store = match self.format {
            StorageFormat::Json => {
                let raw: RawSourceStore = serde_json::from_slice(&bytes)
                    .map_err(|e| RepositoryError::Json(e.to_string()))?;
                SourceStore {
                    next_id: raw.next_id,
                    sources: decode_records::<SourceRecord>(raw.sources, &path),
                }
            }
            StorageFormat::Bincode => bincode::deserialize(&bytes)
                .map_err(|e| RepositoryError::CorruptedData(e.to_string()))?,
        };

        tracing::debug!(
            "Loaded {} sources from {}",
            store.sources.len(),
            path.display()
        );

        Ok(Some(store))
    }

    fn save_sources(&self, store: &SourceStore) -> Result<()> {
        let path = self.sources_path();
        let bytes = self.encode(store)?;
        self.write_atomic(&path, &bytes)?;

        tracing::debug!("Saved {} sources to {}", store.sources.len(), path.display());

        Ok(())
    }

    fn load_exposures(&self) -> Result<Vec<ExposureEntry>> {
        let path = self.exposures_path();
        let Some(bytes) = Self::read_existing(&path)? else {
            return Ok(Vec::new());
        };

        let entries = match self.format {
            StorageFormat::Json => {
                let raw: Vec<serde_json::Value> = serde_json::from_slice(&bytes)
                    .map_err(|e| RepositoryError::Json(e.to_string()))?;
                decode_records::<ExposureEntry>(raw, &path)
            }
            StorageFormat::Bincode => bincode::deserialize(&bytes)
                .map_err(|e| RepositoryError::CorruptedData(e.to_string()))?,
        };

        tracing::debug!(
            "Loaded {} exposure records from {}",
            entries.len(),
            path.display()
        );

        Ok(entries)
    }

    fn save_exposures(&self, entries: &[ExposureEntry]) -> Result<()> {
        let path = self.exposures_path();
        let bytes = self.encode(&entries)?;
        self.write_atomic(&path, &bytes)?;

        tracing::debug!(
            "Saved {} exposure records to {}",
            entries.len(),
            path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::{ActorId, Timestamp};

    fn record(id: u64, name: &str) -> SourceRecord {
        SourceRecord {
            id,
            name: name.to_string(),
            world: "world".to_string(),
            x: 1.5,
            y: 64.0,
            z: -2.0,
            radius: 12,
            strength: 70,
            power: 6,
            active: true,
        }
    }

    #[test]
    fn format_names_parse_loosely() {
        assert_eq!(StorageFormat::from_config("JSON"), StorageFormat::Json);
        assert_eq!(StorageFormat::from_config("bincode"), StorageFormat::Bincode);
        assert_eq!(StorageFormat::from_config("yaml"), StorageFormat::Json);
    }

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path(), StorageFormat::Json).unwrap();
        assert!(repo.load_sources().unwrap().is_none());
        assert!(repo.load_exposures().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path(), StorageFormat::Json).unwrap();
        let good = serde_json::to_value(record(1, "good")).unwrap();
        let contents = serde_json::json!({
            "next_id": 9,
            "sources": [good, { "id": 2, "name": "broken" }],
        });
        fs::write(repo.sources_path(), contents.to_string()).unwrap();

        let store = repo.load_sources().unwrap().unwrap();

        assert_eq!(store.next_id, 9);
        assert_eq!(store.sources, vec![record(1, "good")]);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path(), StorageFormat::Json).unwrap();
        fs::write(repo.exposures_path(), "not json").unwrap();
        assert!(matches!(
            repo.load_exposures(),
            Err(RepositoryError::Json(_))
        ));
    }

    #[test]
    fn bincode_round_trip_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path(), StorageFormat::Bincode).unwrap();
        assert_eq!(repo.base_dir(), dir.path());
        assert_eq!(repo.format(), StorageFormat::Bincode);
        assert_eq!(repo.sources_path(), dir.path().join("sources.bin"));
        let store = SourceStore {
            next_id: 3,
            sources: vec![record(1, "a"), record(2, "b")],
        };
        let entries = vec![ExposureEntry {
            actor: ActorId(4),
            level: 33,
            buff_expiry: Some(Timestamp(99)),
        }];

        repo.save_sources(&store).unwrap();
        repo.save_exposures(&entries).unwrap();

        assert_eq!(repo.load_sources().unwrap(), Some(store));
        assert_eq!(repo.load_exposures().unwrap(), entries);

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert!(names.iter().all(|n| !n.ends_with(".tmp")), "{names:?}");
        assert!(names.contains(&"sources.bin".to_string()));
    }
}
