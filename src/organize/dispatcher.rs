// src/organize/dispatcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ConfigFile, Destination};
use crate::errors::{PrefixError, Result};
use crate::fs::{DirEntry, FileSystem};
use crate::organize::matcher::matches;
use crate::organize::relocate::relocate;
use crate::organize::OrganizeOutcome;

/// A move that an organize pass would attempt, as reported by
/// [`Organizer::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    /// `None` when no rule matches; the file stays where it is.
    pub dest: Option<PathBuf>,
}

/// Runs organize passes over the dump directory.
///
/// Owns a read-only view of the config and the filesystem it acts on. Cheap
/// to share behind an `Arc`; a pass takes `&self`.
#[derive(Debug, Clone)]
pub struct Organizer {
    fs: Arc<dyn FileSystem>,
    config: Arc<ConfigFile>,
}

impl Organizer {
    pub fn new(fs: Arc<dyn FileSystem>, config: Arc<ConfigFile>) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Move every file in the dump directory to its first matching destination.
    ///
    /// Directories are ignored. A failure on one file is logged, counted as
    /// skipped, and does not stop the pass. Only a failure to list the dump
    /// directory aborts the pass.
    pub fn organize(&self) -> Result<OrganizeOutcome> {
        let mut outcome = OrganizeOutcome::default();

        for entry in self.list_files()? {
            let filename = entry.file_name.to_string_lossy();

            let Some(dest) = self.first_match(&filename) else {
                info!("No match found for: {}", filename);
                outcome.skipped += 1;
                continue;
            };

            let dest_path = dest.path.join(&entry.file_name);
            info!("Moving: {} -> {}", entry.path.display(), dest_path.display());

            match relocate(self.fs.as_ref(), &entry.path, &dest_path) {
                Ok(method) => {
                    info!(?method, "Success: {}", filename);
                    outcome.moved += 1;
                }
                Err(err) => {
                    warn!(error = %err, "Error moving {}: {}", filename, err);
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Classify the dump directory without touching anything.
    pub fn plan(&self) -> Result<Vec<PlannedMove>> {
        let planned = self
            .list_files()?
            .into_iter()
            .map(|entry| {
                let filename = entry.file_name.to_string_lossy().into_owned();
                let dest = self
                    .first_match(&filename)
                    .map(|d| d.path.join(&entry.file_name));
                PlannedMove {
                    source: entry.path,
                    dest,
                }
            })
            .collect();
        Ok(planned)
    }

    /// First destination, in configured order, whose rule matches `filename`.
    fn first_match(&self, filename: &str) -> Option<&Destination> {
        self.config
            .destinations
            .iter()
            .find(|dest| matches(filename, dest))
    }

    fn list_files(&self) -> Result<Vec<DirEntry>> {
        let dump = &self.config.dump_directory;
        let entries = self
            .fs
            .read_dir(dump)
            .map_err(|source| PrefixError::DirectoryList {
                path: dump.clone(),
                source,
            })?;

        let (dirs, files): (Vec<DirEntry>, Vec<DirEntry>) =
            entries.into_iter().partition(|e| e.is_dir);
        if !dirs.is_empty() {
            debug!(count = dirs.len(), "ignoring directories in dump directory");
        }
        Ok(files)
    }
}
