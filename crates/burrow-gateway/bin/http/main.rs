mod cli;

use crate::cli::{GeneratorArg, PersistenceArg, CLI};
use anyhow::Context;
use burrow_core::{Snapshot, SnapshotStore};
use burrow_gateway::{telemetry, App, AppState};
use burrow_generator::{Generator, RandomGenerator, SeqGenerator};
use burrow_storage::{
    Flusher, FlusherSettings, JsonFileSnapshotStore, MemorySnapshotStore, ShortCodeStore,
    StoreSettings,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    telemetry::init(config.log_format.into()).context("failed to install tracing subscriber")?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        snapshot_path = %config.snapshot_path.display(),
        persistence = %config.persistence,
        generator = %config.generator,
        flush_interval_secs = config.flush_interval_secs,
        max_attempts = config.max_attempts,
        "starting gateway server"
    );

    match (config.persistence, config.generator) {
        (PersistenceArg::JsonFile, GeneratorArg::Random) => {
            let snapshots = JsonFileSnapshotStore::new(&config.snapshot_path);
            run_server(&config, snapshots, |_| RandomGenerator::new()).await
        }
        (PersistenceArg::JsonFile, GeneratorArg::Seq) => {
            let snapshots = JsonFileSnapshotStore::new(&config.snapshot_path);
            run_server(&config, snapshots, resume_seq).await
        }
        (PersistenceArg::InMemory, GeneratorArg::Random) => {
            run_server(&config, MemorySnapshotStore::new(), |_| RandomGenerator::new()).await
        }
        (PersistenceArg::InMemory, GeneratorArg::Seq) => {
            run_server(&config, MemorySnapshotStore::new(), resume_seq).await
        }
    }
}

/// Continues the sequence after the codes issued by earlier runs.
fn resume_seq(snapshot: &Snapshot) -> SeqGenerator {
    let generator = SeqGenerator::resuming(snapshot.keys().map(String::as_str));
    info!(next = %generator.peek(), "resuming sequential generator");
    generator
}

async fn run_server<S, G, F>(config: &CLI, snapshots: S, make_generator: F) -> anyhow::Result<()>
where
    S: SnapshotStore,
    G: Generator,
    F: FnOnce(&Snapshot) -> G,
{
    let settings = StoreSettings::builder()
        .max_attempts(usize::try_from(config.max_attempts).unwrap_or(usize::MAX))
        .build();

    // A snapshot we cannot read may hide codes that were already handed out.
    let snapshot = snapshots
        .load()
        .await
        .context("failed to load short code snapshot")?;
    info!(entries = snapshot.len(), "loaded short code snapshot");

    let generator = make_generator(&snapshot);
    let store = ShortCodeStore::from_snapshot(snapshot, snapshots, generator, settings);

    let flusher = Flusher::spawn(
        store.clone(),
        FlusherSettings::builder()
            .interval(Duration::from_secs(config.flush_interval_secs))
            .build(),
    );

    let state = AppState::new(Arc::new(store), config.public_base_url.clone());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let served = axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    flusher.shutdown().await;
    info!("gateway stopped");

    served.context("http server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
