#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use prefix::config::{ConfigFile, Destination, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// `build()` goes through validation; `build_unchecked()` does not.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(dump_directory: impl Into<PathBuf>) -> Self {
        Self {
            config: RawConfigFile {
                dump_directory: dump_directory.into().to_string_lossy().into_owned(),
                debounce: None,
                destinations: Vec::new(),
            },
        }
    }

    pub fn debounce(mut self, duration: &str) -> Self {
        self.config.debounce = Some(duration.to_string());
        self
    }

    pub fn with_destination(mut self, dest: Destination) -> Self {
        self.config.destinations.push(dest);
        self
    }

    pub fn with_prefix_rule(self, path: impl Into<PathBuf>, prefix: &str) -> Self {
        self.with_destination(Destination::new(path).with_prefix(prefix))
    }

    pub fn with_suffix_rule(self, path: impl Into<PathBuf>, suffix: &str) -> Self {
        self.with_destination(Destination::new(path).with_suffix(suffix))
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn build_unchecked(self) -> ConfigFile {
        ConfigFile::new_unchecked(
            self.config.dump_directory,
            Duration::from_secs(5),
            self.config.destinations,
        )
    }
}
