// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{default_config_path, default_log_path};

/// Command-line arguments for `prefix`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prefix",
    version,
    about = "Move files out of a dump directory based on file name prefix/suffix rules.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `<config dir>/prefix/prefix.toml`. A template is created there
    /// on first run.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Organize the dump directory once and exit, no watching.
    #[arg(long)]
    pub once: bool,

    /// Validate the config and print what would be moved, without moving anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Override the debounce window from the config (e.g. "500ms", "5s").
    #[arg(long, value_name = "DURATION")]
    pub debounce: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PREFIX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Append logs to this file.
    ///
    /// Default: `app.log` in the same directory as the config file.
    #[arg(long, value_name = "PATH", conflicts_with = "log_stderr")]
    pub log_file: Option<PathBuf>,

    /// Write logs to stderr instead of a log file.
    #[arg(long)]
    pub log_stderr: bool,
}

impl CliArgs {
    /// `--config`, or the per-user default location.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Where logs are appended; `None` means stderr.
    pub fn log_destination(&self) -> Option<PathBuf> {
        if self.log_stderr {
            return None;
        }
        Some(
            self.log_file
                .clone()
                .unwrap_or_else(|| default_log_path(&self.config_path())),
        )
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
