//! File-based Snapshot Store Adapter
//!
//! Stores each hierarchy as one YAML file named after its id, so snapshots
//! can be inspected and edited by hand.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::ahp::HierarchySnapshot;
use crate::domain::foundation::{HierarchyId, Timestamp};
use crate::ports::{SnapshotStore, SnapshotStoreError, StoredSnapshot, StoredSnapshotInfo};

/// File-based storage for hierarchy snapshots
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    base_path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a new file store with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSnapshotStore::new("./data/hierarchies");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the snapshot file path for a hierarchy
    fn snapshot_file_path(&self, id: HierarchyId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> Result<(), SnapshotStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SnapshotStoreError::IoError(e.to_string()))
    }

    async fn read_stored(&self, path: &Path) -> Result<StoredSnapshot, SnapshotStoreError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| SnapshotStoreError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml)
            .map_err(|e| SnapshotStoreError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(
        &self,
        id: HierarchyId,
        snapshot: &HierarchySnapshot,
    ) -> Result<StoredSnapshotInfo, SnapshotStoreError> {
        self.ensure_dir().await?;

        let stored = StoredSnapshot {
            id,
            saved_at: Timestamp::now(),
            snapshot: snapshot.clone(),
        };

        let yaml = serde_yaml::to_string(&stored)
            .map_err(|e| SnapshotStoreError::SerializationFailed(e.to_string()))?;

        let file_path = self.snapshot_file_path(id);
        fs::write(&file_path, yaml)
            .await
            .map_err(|e| SnapshotStoreError::IoError(e.to_string()))?;

        debug!(hierarchy_id = %id, path = %file_path.display(), "Saved hierarchy snapshot");
        Ok(StoredSnapshotInfo::from(&stored))
    }

    async fn load(&self, id: HierarchyId) -> Result<StoredSnapshot, SnapshotStoreError> {
        let file_path = self.snapshot_file_path(id);

        if !file_path.exists() {
            return Err(SnapshotStoreError::NotFound(id));
        }

        self.read_stored(&file_path).await
    }

    async fn exists(&self, id: HierarchyId) -> Result<bool, SnapshotStoreError> {
        Ok(self.snapshot_file_path(id).exists())
    }

    async fn delete(&self, id: HierarchyId) -> Result<(), SnapshotStoreError> {
        let file_path = self.snapshot_file_path(id);

        if file_path.exists() {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| SnapshotStoreError::IoError(e.to_string()))?;
            debug!(hierarchy_id = %id, "Deleted hierarchy snapshot");
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredSnapshotInfo>, SnapshotStoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| SnapshotStoreError::IoError(e.to_string()))?;

        let mut infos = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SnapshotStoreError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }
            // Foreign YAML files in the directory are skipped, not fatal.
            match self.read_stored(&path).await {
                Ok(stored) => infos.push(StoredSnapshotInfo::from(&stored)),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "Skipping unreadable file")
                }
            }
        }

        infos.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(infos)
    }
}
