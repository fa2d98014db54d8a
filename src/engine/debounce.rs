// src/engine/debounce.rs

//! Trailing-edge debounce for organize passes.
//!
//! State machine:
//!
//! ```text
//! IDLE      --trigger--> ARMED(now + window)
//! ARMED(d)  --trigger--> ARMED(now + window)   previous timer cancelled
//! ARMED(d)  --fire@d---> IDLE                  action runs once
//! *         --shutdown-> SHUT DOWN             pending timer cancelled
//! ```
//!
//! The pending timer lives in a single slot behind a mutex. Both the trigger
//! path and the timer task take that lock for every read-modify-write of the
//! slot. Each timer carries a generation number; a timer that wakes up and
//! finds a different generation in the slot has been superseded and exits
//! without running the action.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Action run when the window elapses with no further trigger.
pub type DebounceAction = Arc<dyn Fn() + Send + Sync + 'static>;

struct PendingFire {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct DebounceState {
    pending: Option<PendingFire>,
    next_generation: u64,
    shut_down: bool,
}

struct Shared {
    window: Duration,
    action: DebounceAction,
    state: Mutex<DebounceState>,
    /// Held for the duration of every action run, so runs never overlap.
    run_lock: tokio::sync::Mutex<()>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restartable delayed invocation of a single action.
///
/// `on_trigger` must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct Debouncer {
    shared: Arc<Shared>,
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.shared.window)
            .field("armed", &self.is_armed())
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    pub fn new<F>(window: Duration, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                window,
                action: Arc::new(action),
                state: Mutex::new(DebounceState::default()),
                run_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.shared.window
    }

    /// Record a trigger: cancel any pending timer and arm a fresh one for
    /// `now + window`.
    ///
    /// Returns `false` (and does nothing) once [`shutdown`](Self::shutdown)
    /// has been called.
    pub fn on_trigger(&self) -> bool {
        let mut state = self.shared.lock_state();
        if state.shut_down {
            debug!("trigger ignored; debouncer is shut down");
            return false;
        }

        if let Some(previous) = state.pending.take() {
            previous.handle.abort();
            debug!(generation = previous.generation, "cancelled pending timer");
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(fire_after_window(shared, generation));
        state.pending = Some(PendingFire { generation, handle });

        debug!(
            generation,
            window = ?self.shared.window,
            "armed debounce timer"
        );
        true
    }

    /// Cancel any pending timer and refuse further triggers.
    ///
    /// A pass that has already started is not interrupted; use
    /// [`wait_idle`](Self::wait_idle) to wait for it.
    pub fn shutdown(&self) {
        let mut state = self.shared.lock_state();
        state.shut_down = true;
        if let Some(pending) = state.pending.take() {
            pending.handle.abort();
            info!("Stopped file organization timer");
        }
    }

    /// True while a timer is pending.
    pub fn is_armed(&self) -> bool {
        self.shared.lock_state().pending.is_some()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.lock_state().shut_down
    }

    /// Wait until no action is running.
    pub async fn wait_idle(&self) {
        let _guard = self.shared.run_lock.lock().await;
    }
}

async fn fire_after_window(shared: Arc<Shared>, generation: u64) {
    tokio::time::sleep(shared.window).await;

    {
        let mut state = shared.lock_state();
        let current = state.pending.as_ref().map(|p| p.generation);
        if state.shut_down || current != Some(generation) {
            debug!(generation, "timer superseded; not firing");
            return;
        }
        // Back to IDLE before running, so triggers during the run arm a new
        // timer instead of being lost.
        state.pending = None;
    }

    let _run = shared.run_lock.lock().await;
    if shared.lock_state().shut_down {
        debug!(generation, "shut down while waiting for previous pass; not firing");
        return;
    }
    info!("Timer expired, organizing files...");
    let action = Arc::clone(&shared.action);
    if let Err(err) = tokio::task::spawn_blocking(move || action()).await {
        error!(error = %err, "organize pass panicked");
    }
}
