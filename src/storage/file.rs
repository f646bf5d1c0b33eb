//! JSON file backed gateway

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};

use super::StorageGateway;
use crate::error::StorageError;

/// Stores every key in one JSON object file.
///
/// The object is read once on first access and kept in memory; each `set`
/// rewrites the file through a temporary sibling and a rename so a crash
/// never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileGateway {
    path: PathBuf,
    entries: Mutex<Option<Map<String, Value>>>,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Default data file under the platform data directory
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let proj_dirs = ProjectDirs::from("com", "countdown-keeper", "countdown-keeper")
            .ok_or_else(|| StorageError::Unavailable("Could not determine data directory".to_string()))?;
        Ok(proj_dirs.data_dir().join("timers.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No data file at {:?}, starting empty", self.path);
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => {
                warn!("Data file {:?} is not a JSON object, ignoring its contents", self.path);
                Ok(Map::new())
            }
            Err(e) => {
                warn!("Data file {:?} is malformed ({}), ignoring its contents", self.path, e);
                Ok(Map::new())
            }
        }
    }

    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageGateway for FileGateway {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.read_entries().await?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.read_entries().await?,
        };
        entries.insert(key.to_string(), value);

        // Left empty on failure so the next access re-reads the file
        self.write_entries(&entries).await?;
        *guard = Some(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FileGateway::new(dir.path().join("timers.json"));
        assert_eq!(gateway.get("timers").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("timers.json");

        let gateway = FileGateway::new(&path);
        gateway.set("timers", json!([{"id": "a"}])).await.unwrap();
        gateway.set("other", json!(1)).await.unwrap();

        let reopened = FileGateway::new(&path);
        assert_eq!(reopened.path(), path);
        assert_eq!(reopened.get("timers").await.unwrap(), Some(json!([{"id": "a"}])));
        assert_eq!(reopened.get("other").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn malformed_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timers.json");
        std::fs::write(&path, "{not json").unwrap();

        let gateway = FileGateway::new(&path);
        assert_eq!(gateway.get("timers").await.unwrap(), None);

        gateway.set("timers", json!([])).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"timers\""));
    }

    #[tokio::test]
    async fn failed_write_keeps_the_last_written_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timers.json");
        let gateway = FileGateway::new(&path);
        gateway.set("timers", json!([{"id": "a"}])).await.unwrap();

        // A directory at the temp path makes the next write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(gateway.set("timers", json!([{"id": "b"}])).await.is_err());
        assert_eq!(gateway.get("timers").await.unwrap(), Some(json!([{"id": "a"}])));
    }
}
