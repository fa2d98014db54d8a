// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;

use super::{Debouncer, RuntimeEvent};

/// Drives the [`Debouncer`] in response to [`RuntimeEvent`]s.
///
/// One task reads the event channel in arrival order; every change event
/// becomes a trigger. Shutdown cancels the pending timer and waits for a pass
/// that is already running.
pub struct Runtime {
    debouncer: Debouncer,
    event_rx: mpsc::Receiver<RuntimeEvent>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(debouncer: Debouncer, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self {
            debouncer,
            event_rx,
        }
    }

    /// Main event loop. Returns once shutdown is requested or every sender
    /// has been dropped.
    pub async fn run(mut self) -> Result<()> {
        info!(
            window = ?self.debouncer.window(),
            "File organizer started. Press Ctrl+C to stop."
        );

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            match event {
                RuntimeEvent::PathsChanged { kind, paths } => {
                    debug!(?kind, ?paths, "filesystem event");
                    self.debouncer.on_trigger();
                }
                RuntimeEvent::WatchError(err) => {
                    warn!(error = %err, "file watch error");
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; shutting down gracefully");
                    break;
                }
            }
        }

        self.debouncer.shutdown();
        self.debouncer.wait_idle().await;
        info!("File organizer stopped");
        Ok(())
    }
}
