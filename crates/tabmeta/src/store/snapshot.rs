//! File-backed object store snapshot.
//!
//! The snapshot is a pretty-printed JSON document of every object path and
//! its attributes. It makes the CLI exercisable end to end: load a
//! snapshot, run a batch against it, save it back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Avu, MemoryStore, ObjectStore};
use crate::error::{Result, TabmetaError};

/// On-disk snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Object path -> attached attributes.
    pub objects: BTreeMap<String, Vec<Avu>>,
}

/// An object store loaded from, and saved back to, a JSON snapshot file.
#[derive(Debug)]
pub struct SnapshotStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl SnapshotStore {
    /// Load a snapshot file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TabmetaError::store(format!("cannot read snapshot {}: {}", path.display(), e))
        })?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content).map_err(|e| {
            TabmetaError::store(format!("invalid snapshot {}: {}", path.display(), e))
        })?;

        Ok(Self {
            inner: MemoryStore::from_objects(snapshot.objects),
            path: path.to_path_buf(),
        })
    }

    /// Write the current contents back to the snapshot file.
    ///
    /// Atomic write: temp file in the same directory, then rename.
    pub async fn save(&self) -> Result<()> {
        let snapshot = StoreSnapshot {
            objects: self.inner.dump().await,
        };
        let content = serde_json::to_string_pretty(&snapshot)?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// The snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ObjectStore for SnapshotStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        self.inner.exists(path).await
    }

    async fn search(
        &self,
        workdir: &str,
        identifier: &str,
        exact_match: bool,
    ) -> Result<Vec<String>> {
        self.inner.search(workdir, identifier, exact_match).await
    }

    async fn add_metadata(&self, path: &str, attributes: &[(String, String)]) -> Result<()> {
        self.inner.add_metadata(path, attributes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn snapshot_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_apply_save_round_trip() {
        let file = snapshot_file(r#"{"objects": {"/zoneA/home/projX/a.txt": []}}"#);

        let store = SnapshotStore::load(file.path()).unwrap();
        store
            .add_metadata(
                "/zoneA/home/projX/a.txt",
                &[("tag".to_string(), "one".to_string())],
            )
            .await
            .unwrap();
        store.save().await.unwrap();

        let reloaded = SnapshotStore::load(file.path()).unwrap();
        assert!(reloaded.exists("/zoneA/home/projX/a.txt").await.unwrap());

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("\"tag\""));
        assert!(content.contains("\"one\""));
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let file = snapshot_file("{ not json");
        let err = SnapshotStore::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid snapshot"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SnapshotStore::load("/no/such/snapshot.json").unwrap_err();
        assert!(err.to_string().contains("cannot read snapshot"));
    }
}
