// src/watch/mod.rs

//! Filesystem notifications.
//!
//! Wires a `notify` watcher on the dump directory into the runtime's event
//! channel. It does not filter or interpret events; the debouncer and the
//! organizer decide what to do with them.

pub mod watcher;

pub use watcher::{spawn_watcher, WatcherHandle};
