// src/errors.rs

//! Crate-wide error types.
//!
//! Per-file relocation failures are described by [`RelocateError`]; they are
//! logged and counted by the organizer, never propagated past a single file.
//! Everything else goes through [`PrefixError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefixError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The dump directory could not be listed. Aborts one organize pass only.
    #[error("failed to read dump directory {path:?}: {source}")]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why moving a single file failed.
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("failed to create destination directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination file already exists: {path:?}")]
    DestinationExists { path: PathBuf },

    #[error("failed to copy file {source_path:?} -> {dest_path:?}: {source}")]
    Copy {
        source_path: PathBuf,
        dest_path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove source file {path:?}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PrefixError>;
