use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    error::{GenerationError, Result},
    storage::traits::KeyValueStore,
};

/// Key-value slots persisted as a flat JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes reads against read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Sibling file the next snapshot is written to before it replaces `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn persist(&self, contents: String) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                GenerationError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, contents).await.map_err(|e| {
            GenerationError::Storage(format!("failed to write {}: {}", staging.display(), e))
        })?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(GenerationError::Storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }
        Ok(())
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                GenerationError::Storage(format!(
                    "corrupt key store {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(GenerationError::Storage(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());

        let contents = serde_json::to_string_pretty(&entries)?;
        self.persist(contents).await?;

        log::debug!("Persisted '{}' to {}", key, self.path.display());
        Ok(())
    }
}
