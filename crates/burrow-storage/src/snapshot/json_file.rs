use async_trait::async_trait;
use burrow_core::{PersistenceError, Snapshot, SnapshotStore};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Persists snapshots as a pretty-printed JSON object of `code -> url`.
///
/// Saves go to a sibling `<file>.tmp`, which is synced to disk and then
/// renamed over the target, so readers only ever see a complete snapshot. The backend does
/// not coordinate concurrent writers itself; [`ShortCodeStore`] serialises
/// its flushes.
///
/// [`ShortCodeStore`]: crate::ShortCodeStore
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn write_temp(&self, temp: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(temp).await?;
        file.write_all(data).await?;
        file.sync_all().await
    }

    fn unavailable(&self, action: &str, e: std::io::Error) -> PersistenceError {
        PersistenceError::Unavailable(format!(
            "failed to {action} '{}': {e}",
            self.path.display()
        ))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Snapshot, PersistenceError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "snapshot file not found, starting empty");
                return Ok(Snapshot::new());
            }
            Err(e) => return Err(self.unavailable("read", e)),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            info!(path = %self.path.display(), "snapshot file is empty, starting empty");
            return Ok(Snapshot::new());
        }

        serde_json::from_slice(&data).map_err(|e| {
            PersistenceError::Malformed(format!("'{}': {e}", self.path.display()))
        })
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        // Sorted keys keep the file stable between saves.
        let ordered: BTreeMap<&String, &String> = snapshot.iter().collect();
        let data = serde_json::to_vec_pretty(&ordered)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        self.write_temp(&temp, &data)
            .await
            .map_err(|e| self.unavailable("write temporary snapshot for", e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.unavailable("replace", e))?;

        debug!(path = %self.path.display(), entries = snapshot.len(), "snapshot saved");
        Ok(())
    }
}
