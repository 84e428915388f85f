//! In-Memory Snapshot Store Adapter
//!
//! Keeps snapshots in memory. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::ahp::HierarchySnapshot;
use crate::domain::foundation::{HierarchyId, Timestamp};
use crate::ports::{SnapshotStore, SnapshotStoreError, StoredSnapshot, StoredSnapshotInfo};

/// In-memory storage for hierarchy snapshots
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<HierarchyId, StoredSnapshot>>>,
}

impl InMemorySnapshotStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.snapshots.write().await.clear();
    }

    /// Get the number of stored snapshots
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save(
        &self,
        id: HierarchyId,
        snapshot: &HierarchySnapshot,
    ) -> Result<StoredSnapshotInfo, SnapshotStoreError> {
        let stored = StoredSnapshot {
            id,
            saved_at: Timestamp::now(),
            snapshot: snapshot.clone(),
        };
        let info = StoredSnapshotInfo::from(&stored);
        self.snapshots.write().await.insert(id, stored);
        Ok(info)
    }

    async fn load(&self, id: HierarchyId) -> Result<StoredSnapshot, SnapshotStoreError> {
        self.snapshots
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SnapshotStoreError::NotFound(id))
    }

    async fn exists(&self, id: HierarchyId) -> Result<bool, SnapshotStoreError> {
        Ok(self.snapshots.read().await.contains_key(&id))
    }

    async fn delete(&self, id: HierarchyId) -> Result<(), SnapshotStoreError> {
        self.snapshots.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredSnapshotInfo>, SnapshotStoreError> {
        let mut infos: Vec<StoredSnapshotInfo> = self
            .snapshots
            .read()
            .await
            .values()
            .map(StoredSnapshotInfo::from)
            .collect();
        infos.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(infos)
    }
}
