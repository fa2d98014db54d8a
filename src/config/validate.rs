// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, DEFAULT_DEBOUNCE};
use crate::errors::{PrefixError, Result};
use crate::fs::FileSystem;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PrefixError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let debounce = match raw.debounce.as_deref() {
            Some(s) => parse_debounce(s)?,
            None => DEFAULT_DEBOUNCE,
        };
        Ok(ConfigFile::new_unchecked(
            raw.dump_directory,
            debounce,
            raw.destinations,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_dump_directory_set(cfg)?;
    ensure_has_destinations(cfg)?;
    validate_destinations(cfg)?;
    Ok(())
}

fn ensure_dump_directory_set(cfg: &RawConfigFile) -> Result<()> {
    if cfg.dump_directory.trim().is_empty() {
        return Err(PrefixError::ConfigError(
            "dump_directory is empty in config file".to_string(),
        ));
    }
    Ok(())
}

fn ensure_has_destinations(cfg: &RawConfigFile) -> Result<()> {
    if cfg.destinations.is_empty() {
        return Err(PrefixError::ConfigError(
            "no destinations configured; add at least one [[destinations]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_destinations(cfg: &RawConfigFile) -> Result<()> {
    for (i, dest) in cfg.destinations.iter().enumerate() {
        if dest.path.as_os_str().is_empty() {
            return Err(PrefixError::ConfigError(format!(
                "destination[{i}] has empty path"
            )));
        }
        if dest.prefix().is_none() && dest.suffix().is_none() {
            return Err(PrefixError::ConfigError(format!(
                "destination[{i}] must have at least prefix or suffix"
            )));
        }
    }
    Ok(())
}

fn parse_debounce(s: &str) -> Result<Duration> {
    let window = parse_duration(s)
        .map_err(|e| PrefixError::ConfigError(format!("invalid debounce: {e}")))?;
    if window.is_zero() {
        return Err(PrefixError::ConfigError(
            "debounce must be greater than zero".to_string(),
        ));
    }
    Ok(window)
}

/// Startup check: the dump directory must exist and be a directory.
pub fn validate_dump_directory(fs: &dyn FileSystem, cfg: &ConfigFile) -> Result<()> {
    if !fs.exists(&cfg.dump_directory) {
        return Err(PrefixError::ConfigError(format!(
            "Dump directory does not exist: {}",
            cfg.dump_directory.display()
        )));
    }
    if !fs.is_dir(&cfg.dump_directory) {
        return Err(PrefixError::ConfigError(format!(
            "Dump directory is not a directory: {}",
            cfg.dump_directory.display()
        )));
    }
    Ok(())
}

/// Parse a duration string like `"500ms"`, `"5s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };
    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{}'", s))
}
