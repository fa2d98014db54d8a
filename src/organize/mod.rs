// src/organize/mod.rs

//! File classification and relocation.
//!
//! - [`matcher`] decides whether a file name satisfies a destination rule.
//! - [`relocate`] moves one file, preferring an atomic rename and falling back
//!   to copy + delete.
//! - [`dispatcher`] lists the dump directory, picks the first matching rule per
//!   file and tallies the outcome of a pass.
//!
//! Nothing in here knows about timers or filesystem events.

pub mod dispatcher;
pub mod matcher;
pub mod relocate;

use std::fmt;

pub use dispatcher::{Organizer, PlannedMove};
pub use matcher::matches;
pub use relocate::{relocate, RelocateMethod};

/// Tally of a single organize pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeOutcome {
    pub moved: usize,
    pub skipped: usize,
}

impl fmt::Display for OrganizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files moved, {} files skipped",
            self.moved, self.skipped
        )
    }
}
