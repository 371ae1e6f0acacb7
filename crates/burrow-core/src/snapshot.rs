use crate::error::PersistenceError;
use async_trait::async_trait;
use std::collections::HashMap;

/// A point-in-time copy of every `code -> url` pair in a store.
pub type Snapshot = HashMap<String, String>;

/// Durable storage for store snapshots.
///
/// Implementations always read and write the full mapping; there is no
/// incremental update.
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Reads the most recently saved snapshot.
    ///
    /// A backend that has never been written to yields an empty snapshot.
    async fn load(&self) -> Result<Snapshot, PersistenceError>;

    /// Replaces the durable content with `snapshot`.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}
