// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::PrefixError;

/// Template written on first run when no config file exists yet.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# prefix configuration
#
# Files that land in `dump_directory` are moved into the first destination
# whose prefix and/or suffix matches the file name.

dump_directory = ""

# Quiet period after the last filesystem event before files are organized.
debounce = "5s"

[[destinations]]
path = ""
prefix = ""
# suffix = ""
"#;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: RawConfigFile = toml::from_str(&contents)
        .map_err(PrefixError::from)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)
        .with_context(|| format!("validating config file {:?}", path))?;
    info!(path = ?path, "loaded config file");
    Ok(config)
}

/// Like [`load_and_validate`], but writes [`DEFAULT_CONFIG_TEMPLATE`] when the
/// file is missing and then fails, asking the user to fill it in.
pub fn load_or_init(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(_) => load_and_validate(path),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = ?path, "config file not found; creating a default one");
            write_default_config(path)?;
            Err(PrefixError::ConfigError(format!(
                "created default config file at {}; edit it and restart",
                path.display()
            ))
            .into())
        }
        Err(err) => {
            Err(err).with_context(|| format!("checking config file at {:?}", path))
        }
    }
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {:?}", parent))?;
        }
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("writing default config to {:?}", path))?;
    Ok(())
}

/// Default config location: `<config dir>/prefix/prefix.toml`.
///
/// Falls back to `prefix.toml` in the working directory on platforms without
/// a per-user config directory.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("prefix").join("prefix.toml"),
        None => PathBuf::from("prefix.toml"),
    }
}

/// Log file used when `--log-file` is not given: `app.log` next to the
/// config file.
pub fn default_log_path(config_path: &Path) -> PathBuf {
    match config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.join("app.log"),
        None => PathBuf::from("app.log"),
    }
}
