// src/watch/watcher.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `dump_dir` (non-recursively) and forward every event as
/// `RuntimeEvent::PathsChanged` and every watcher error as
/// `RuntimeEvent::WatchError`.
pub fn spawn_watcher(
    dump_dir: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let dump_dir = dump_dir.into();

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) =
        mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send(res) {
                // Receiver gone means the runtime is shutting down.
                eprintln!("prefix: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )
    .context("creating filesystem watcher")?;

    watcher
        .watch(&dump_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching dump directory {:?}", dump_dir))?;

    info!("file watcher started on {:?}", dump_dir);

    tokio::spawn(async move {
        while let Some(res) = event_rx.recv().await {
            let event = match res {
                Ok(event) => RuntimeEvent::PathsChanged {
                    kind: event.kind,
                    paths: event.paths,
                },
                Err(err) => RuntimeEvent::WatchError(err.to_string()),
            };

            if let Err(err) = runtime_tx.send(event).await {
                warn!("failed to forward watcher event to runtime: {err}");
                // Runtime is gone; nothing left to feed.
                return;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
