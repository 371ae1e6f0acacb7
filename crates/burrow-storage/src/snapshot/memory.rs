use async_trait::async_trait;
use burrow_core::{PersistenceError, Snapshot, SnapshotStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A snapshot backend that keeps the last saved snapshot in memory.
///
/// Nothing survives a restart. Useful for tests and for running the
/// gateway without a backing file.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    saved: Mutex<Snapshot>,
    saves: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose first `load` returns `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(snapshot),
            saves: AtomicUsize::new(0),
        }
    }

    /// Returns a copy of the last saved snapshot.
    pub fn saved(&self) -> Snapshot {
        self.saved.lock().clone()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Snapshot, PersistenceError> {
        Ok(self.saved.lock().clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        *self.saved.lock() = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
