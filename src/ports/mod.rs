//! Ports - Interfaces between the domain and the outside world.
//!
//! The engine itself is pure; the only collaborator it needs an interface
//! for is persistence of hierarchy snapshots.

mod snapshot_store;

pub use snapshot_store::{SnapshotStore, SnapshotStoreError, StoredSnapshot, StoredSnapshotInfo};
