use async_trait::async_trait;
use burrow_core::{
    PersistenceError, ShortCode, Shortener, ShortenerError, Snapshot, SnapshotStore,
};
use burrow_generator::Generator;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

/// Candidates tried per insert before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Configures a [`ShortCodeStore`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct StoreSettings {
    /// How many generated candidates an insert may reject as collisions
    /// before failing with [`ShortenerError::CodeSpaceExhausted`].
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Coalesces write-through requests into at most one running save task.
#[derive(Debug, Default)]
struct WriteBack {
    dirty: AtomicBool,
    running: AtomicBool,
}

/// A concurrency-safe mapping from short code to original URL.
///
/// Every read and write of the mapping goes through one `RwLock`. An insert
/// holds the write lock across generate, check and commit, so two inserts
/// can never both see a candidate as free. Persistence runs after the lock
/// is released, against a copy of the mapping, on a background task: an
/// insert only requests a save and never waits for the disk. Requests that
/// arrive while a save is running are folded into one follow-up save of the
/// latest mapping.
///
/// Clones share the same mapping and backend. Inserting requires a tokio
/// runtime.
pub struct ShortCodeStore<G, S> {
    entries: Arc<RwLock<HashMap<String, String>>>,
    generator: Arc<G>,
    snapshots: Arc<S>,
    flush_lock: Arc<tokio::sync::Mutex<()>>,
    write_back: Arc<WriteBack>,
    settings: StoreSettings,
}

impl<G, S> Clone for ShortCodeStore<G, S> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            generator: Arc::clone(&self.generator),
            snapshots: Arc::clone(&self.snapshots),
            flush_lock: Arc::clone(&self.flush_lock),
            write_back: Arc::clone(&self.write_back),
            settings: self.settings,
        }
    }
}

impl<G: Generator, S: SnapshotStore> ShortCodeStore<G, S> {
    /// Creates an empty store without reading `snapshots`.
    pub fn new(snapshots: S, generator: G, settings: StoreSettings) -> Self {
        Self::from_snapshot(Snapshot::new(), snapshots, generator, settings)
    }

    /// Creates a store seeded with the snapshot currently held by `snapshots`.
    ///
    /// Any error is returned as-is: a store must not start serving with an
    /// uncertain view of the codes it has already issued.
    pub async fn load(
        snapshots: S,
        generator: G,
        settings: StoreSettings,
    ) -> Result<Self, PersistenceError> {
        let snapshot = snapshots.load().await?;
        info!(entries = snapshot.len(), "loaded short code snapshot");
        Ok(Self::from_snapshot(snapshot, snapshots, generator, settings))
    }

    /// Creates a store seeded with an already loaded `snapshot`.
    ///
    /// Lets the caller derive generator state from the snapshot first.
    pub fn from_snapshot(
        snapshot: Snapshot,
        snapshots: S,
        generator: G,
        settings: StoreSettings,
    ) -> Self {
        Self {
            entries: Arc::new(RwLock::new(snapshot)),
            generator: Arc::new(generator),
            snapshots: Arc::new(snapshots),
            flush_lock: Arc::new(tokio::sync::Mutex::new(())),
            write_back: Arc::new(WriteBack::default()),
            settings,
        }
    }

    /// Stores `original_url` under a new, unused short code.
    ///
    /// A save of the updated mapping is requested before returning; it runs
    /// in the background and a failure is only logged.
    pub async fn insert(&self, original_url: &str) -> Result<ShortCode, ShortenerError> {
        Self::validate_url(original_url)?;

        let code = self.commit(original_url)?;
        debug!(code = %code, url = %original_url, "issued short code");

        self.request_flush();
        Ok(code)
    }

    /// Marks the mapping dirty and starts a save task unless one is running.
    fn request_flush(&self) {
        self.write_back.dirty.store(true, Ordering::SeqCst);
        if self.write_back.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let store = self.clone();
        tokio::spawn(store.drain_write_back());
    }

    async fn drain_write_back(self) {
        loop {
            while self.write_back.dirty.swap(false, Ordering::SeqCst) {
                if let Err(e) = self.flush().await {
                    warn!(error = %e, "write-through flush failed");
                }
            }

            self.write_back.running.store(false, Ordering::SeqCst);

            // A request that landed after the last swap saw `running` still set.
            if !self.write_back.dirty.load(Ordering::SeqCst)
                || self.write_back.running.swap(true, Ordering::SeqCst)
            {
                return;
            }
        }
    }

    /// Returns the URL stored for `code`, if any.
    pub fn lookup(&self, code: &str) -> Option<String> {
        let url = self.entries.read().get(code).cloned();
        trace!(code = %code, found = url.is_some(), "looked up short code");
        url
    }

    /// Saves a consistent copy of the mapping and returns its size.
    ///
    /// Flushes are serialised, and each one copies the mapping only after
    /// the previous save has finished, so saves never go backwards in time.
    pub async fn flush(&self) -> Result<usize, PersistenceError> {
        let _guard = self.flush_lock.lock().await;
        let snapshot = self.snapshot();
        self.snapshots.save(&snapshot).await?;
        Ok(snapshot.len())
    }

    /// Returns a point-in-time copy of the mapping.
    pub fn snapshot(&self) -> Snapshot {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the snapshot backend.
    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    /// Generate, check and commit under a single write lock.
    fn commit(&self, original_url: &str) -> Result<ShortCode, ShortenerError> {
        let mut entries = self.entries.write();

        for attempt in 1..=self.settings.max_attempts {
            let code: ShortCode = self.generator.generate()?.into();
            match entries.entry(code.as_str().to_owned()) {
                Entry::Occupied(_) => {
                    warn!(code = %code, attempt, "short code collision, retrying");
                }
                Entry::Vacant(slot) => {
                    slot.insert(original_url.to_owned());
                    return Ok(code);
                }
            }
        }

        Err(ShortenerError::CodeSpaceExhausted {
            attempts: self.settings.max_attempts,
        })
    }

    /// Validates that the URL is absolute and has a host.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        // `Url::parse` silently strips these, so the stored string would differ
        // from what was validated.
        if url.chars().any(char::is_control) || url.trim() != url {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must not contain control characters or surrounding whitespace: {:?}",
                url
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("{}: {}", url, e)))?;

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a scheme and a host: {}",
                url
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<G: Generator, S: SnapshotStore> Shortener for ShortCodeStore<G, S> {
    async fn shorten(&self, original_url: &str) -> Result<ShortCode, ShortenerError> {
        self.insert(original_url).await
    }

    fn lookup(&self, code: &str) -> Option<String> {
        ShortCodeStore::lookup(self, code)
    }
}
