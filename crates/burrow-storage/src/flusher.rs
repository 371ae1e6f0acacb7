use crate::store::ShortCodeStore;
use burrow_core::SnapshotStore;
use burrow_generator::Generator;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5 * 60);

const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(1);

/// Configures a [`Flusher`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct FlusherSettings {
    /// Time between two periodic flushes.
    #[builder(default = DEFAULT_FLUSH_INTERVAL)]
    pub interval: Duration,
}

impl Default for FlusherSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Background task that flushes a [`ShortCodeStore`] on a fixed interval.
///
/// The periodic flush runs regardless of write-through activity, so a
/// snapshot that failed to save after an insert is retried within one
/// interval. On [`Flusher::shutdown`], or when the handle is dropped, the
/// task flushes one last time and exits.
pub struct Flusher {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Flusher {
    /// Spawns the flush loop onto the current tokio runtime.
    pub fn spawn<G: Generator, S: SnapshotStore>(
        store: ShortCodeStore<G, S>,
        settings: FlusherSettings,
    ) -> Self {
        let interval = settings.interval.max(MIN_FLUSH_INTERVAL);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(store, interval, shutdown_rx));

        info!(interval_secs = interval.as_secs_f64(), "started periodic flusher");
        Self { shutdown, handle }
    }

    /// Stops the loop and waits for its final flush.
    pub async fn shutdown(self) {
        // The receiver only goes away when the task has already exited.
        let _ = self.shutdown.send(true);

        if let Err(e) = self.handle.await {
            warn!(error = %e, "flusher task ended abnormally");
        }
    }
}

async fn run<G: Generator, S: SnapshotStore>(
    store: ShortCodeStore<G, S>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    // The first tick of `interval` fires immediately; skip it.
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => flush(&store, "periodic").await,
            _ = shutdown.changed() => break,
        }
    }

    flush(&store, "final").await;
    info!("periodic flusher stopped");
}

async fn flush<G: Generator, S: SnapshotStore>(
    store: &ShortCodeStore<G, S>,
    reason: &'static str,
) {
    match store.flush().await {
        Ok(entries) => debug!(reason, entries, "flushed short code snapshot"),
        Err(e) => warn!(reason, error = %e, "flush failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::test_backend::FailingSnapshotStore;
    use crate::{MemorySnapshotStore, StoreSettings};
    use burrow_core::Snapshot;
    use burrow_generator::SeqGenerator;

    fn store_with<S: SnapshotStore>(backend: S) -> ShortCodeStore<SeqGenerator, S> {
        ShortCodeStore::new(backend, SeqGenerator::new(), StoreSettings::default())
    }

    fn every(ms: u64) -> FlusherSettings {
        FlusherSettings::builder()
            .interval(Duration::from_millis(ms))
            .build()
    }

    #[test]
    fn default_interval_is_five_minutes() {
        assert_eq!(FlusherSettings::default().interval, Duration::from_secs(300));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn flushes_periodically() {
        let store = store_with(MemorySnapshotStore::new());
        let flusher = Flusher::spawn(store.clone(), every(20));

        let snapshots = store.snapshots();
        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(10))
            .until_async(|| async move { snapshots.save_count() >= 3 })
            .await;

        flusher.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_performs_final_flush() {
        let backend = MemorySnapshotStore::with_snapshot(Snapshot::from([(
            "aaaaaa".to_string(),
            "https://example.com/old".to_string(),
        )]));
        let store = ShortCodeStore::load(backend, SeqGenerator::new(), StoreSettings::default())
            .await
            .unwrap();
        let flusher = Flusher::spawn(store.clone(), FlusherSettings::default());

        let code = store.insert("https://example.com/new").await.unwrap();
        let snapshots = store.snapshots();
        let key = code.as_str();
        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(10))
            .until_async(|| async move { snapshots.saved().contains_key(key) })
            .await;
        let saves = store.snapshots().save_count();

        flusher.shutdown().await;

        assert_eq!(store.snapshots().save_count(), saves + 1);
        let saved = store.snapshots().saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(
            saved.get(code.as_str()).map(String::as_str),
            Some("https://example.com/new")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dropping_the_handle_flushes_once_more() {
        let store = store_with(MemorySnapshotStore::new());
        let flusher = Flusher::spawn(store.clone(), FlusherSettings::default());

        drop(flusher);

        let snapshots = store.snapshots();
        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(10))
            .until_async(|| async move { snapshots.save_count() == 1 })
            .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn keeps_running_after_failed_flush() {
        let store = store_with(FailingSnapshotStore::default());
        let flusher = Flusher::spawn(store.clone(), every(10));

        let snapshots = store.snapshots();
        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(10))
            .until_async(|| async move { snapshots.attempts() >= 3 })
            .await;

        flusher.shutdown().await;
    }
}
