// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Debounce window used when the config file does not set `debounce`.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(5);

/// Configuration exactly as read from the TOML file.
///
/// ```toml
/// dump_directory = "/home/me/Downloads"
/// debounce = "5s"
///
/// [[destinations]]
/// path = "/home/me/Documents/reports"
/// prefix = "report_"
///
/// [[destinations]]
/// path = "/home/me/Pictures"
/// suffix = ".png"
/// ```
///
/// Nothing here is checked yet; convert into [`ConfigFile`] with
/// `ConfigFile::try_from` to validate.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Directory that is watched and emptied into the destinations.
    #[serde(default)]
    pub dump_directory: String,

    /// Quiescence window as a duration string (`"500ms"`, `"5s"`, `"1m"`).
    #[serde(default)]
    pub debounce: Option<String>,

    /// Ordered rules. The first matching rule wins.
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

/// A single `[[destinations]]` rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Destination {
    /// Target directory, created on demand.
    pub path: PathBuf,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub suffix: Option<String>,
}

impl Destination {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: None,
            suffix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// The prefix, treating `Some("")` the same as unset.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }

    /// The suffix, treating `Some("")` the same as unset.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref().filter(|s| !s.is_empty())
    }
}

/// Validated, immutable configuration handed to the organizer.
///
/// Built once at startup and shared read-only for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub dump_directory: PathBuf,
    pub debounce: Duration,
    pub destinations: Vec<Destination>,
}

impl ConfigFile {
    /// Build a config without running validation.
    ///
    /// Used by tests and by hosts that assemble rules programmatically.
    /// Destinations lacking both prefix and suffix are accepted here and
    /// simply never match.
    pub fn new_unchecked(
        dump_directory: impl Into<PathBuf>,
        debounce: Duration,
        destinations: Vec<Destination>,
    ) -> Self {
        Self {
            dump_directory: dump_directory.into(),
            debounce,
            destinations,
        }
    }
}
