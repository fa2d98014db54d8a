// src/config/mod.rs

//! Configuration loading and validation for prefix.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, creating a template on first run (`loader.rs`).
//! - Validate the rules the organizer relies on (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, default_log_path, load_and_validate, load_from_path, load_or_init,
};
pub use model::{ConfigFile, Destination, RawConfigFile, DEFAULT_DEBOUNCE};
pub use validate::{parse_duration, validate_dump_directory};
