// src/engine/mod.rs

//! Event handling for prefix.
//!
//! - [`debounce`] holds the [`Debouncer`]: a guarded single-slot timer that
//!   turns a burst of triggers into one delayed organize pass.
//! - [`runtime`] is the async loop that consumes [`RuntimeEvent`]s from the
//!   watcher and the signal handler and drives the debouncer.

use std::path::PathBuf;

use notify::EventKind;

pub mod debounce;
pub mod runtime;

pub use debounce::Debouncer;
pub use runtime::Runtime;

/// Events flowing into the runtime from the watcher and signal handling.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Something changed in the dump directory. The kind is carried for
    /// logging only; every kind is treated the same.
    PathsChanged {
        kind: EventKind,
        paths: Vec<PathBuf>,
    },
    /// The notification source reported an error.
    WatchError(String),
    /// Graceful shutdown requested (Ctrl-C / SIGTERM).
    ShutdownRequested,
}
