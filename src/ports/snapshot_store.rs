//! Snapshot Store Port - Interface for persisting decision hierarchies.
//!
//! The engine never persists anything itself; the host saves and loads
//! [`HierarchySnapshot`]s through this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ahp::HierarchySnapshot;
use crate::domain::foundation::{DomainError, ErrorCode, HierarchyId, Timestamp};

/// Errors that can occur during snapshot storage operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("Hierarchy not found: {0}")]
    NotFound(HierarchyId),

    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize snapshot: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<SnapshotStoreError> for DomainError {
    fn from(err: SnapshotStoreError) -> Self {
        match &err {
            SnapshotStoreError::NotFound(id) => {
                DomainError::new(ErrorCode::HierarchyNotFound, err.to_string())
                    .with_detail("hierarchy_id", id.to_string())
            }
            _ => DomainError::new(ErrorCode::StorageError, err.to_string()),
        }
    }
}

/// A stored snapshot together with its storage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub id: HierarchyId,
    pub saved_at: Timestamp,
    pub snapshot: HierarchySnapshot,
}

/// Listing entry for a stored hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSnapshotInfo {
    pub id: HierarchyId,
    pub goal: String,
    pub saved_at: Timestamp,
}

impl From<&StoredSnapshot> for StoredSnapshotInfo {
    fn from(stored: &StoredSnapshot) -> Self {
        Self {
            id: stored.id,
            goal: stored.snapshot.goal.clone(),
            saved_at: stored.saved_at,
        }
    }
}

/// Port for persisting and loading hierarchy snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Save (or overwrite) the snapshot of a hierarchy
    ///
    /// # Errors
    /// Returns `SnapshotStoreError` if save fails
    async fn save(
        &self,
        id: HierarchyId,
        snapshot: &HierarchySnapshot,
    ) -> Result<StoredSnapshotInfo, SnapshotStoreError>;

    /// Load the snapshot of a hierarchy
    ///
    /// # Errors
    /// Returns `SnapshotStoreError::NotFound` if nothing is stored under `id`
    async fn load(&self, id: HierarchyId) -> Result<StoredSnapshot, SnapshotStoreError>;

    /// Check if a snapshot exists
    async fn exists(&self, id: HierarchyId) -> Result<bool, SnapshotStoreError>;

    /// Delete a snapshot. Deleting a missing snapshot is not an error.
    async fn delete(&self, id: HierarchyId) -> Result<(), SnapshotStoreError>;

    /// List stored hierarchies, most recently saved first
    async fn list(&self) -> Result<Vec<StoredSnapshotInfo>, SnapshotStoreError>;
}
