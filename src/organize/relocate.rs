// src/organize/relocate.rs

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::errors::RelocateError;
use crate::fs::FileSystem;

/// How a successful relocation was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateMethod {
    /// Atomic same-filesystem rename.
    Renamed,
    /// Streamed copy followed by removal of the source.
    Copied,
}

/// Move `source` to `dest`.
///
/// 1. Create `dest`'s parent directories.
/// 2. Refuse if `dest` already exists; nothing is ever overwritten.
/// 3. Try an atomic rename.
/// 4. If the rename fails (e.g. across devices), copy the bytes and the
///    permission bits, then remove the source.
///
/// A failed copy may leave a partially written `dest` behind.
pub fn relocate(
    fs: &dyn FileSystem,
    source: &Path,
    dest: &Path,
) -> Result<RelocateMethod, RelocateError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)
            .map_err(|err| RelocateError::DirectoryCreate {
                path: parent.to_path_buf(),
                source: err,
            })?;
    }

    if fs.exists(dest) {
        return Err(RelocateError::DestinationExists {
            path: dest.to_path_buf(),
        });
    }

    match fs.rename(source, dest) {
        Ok(()) => return Ok(RelocateMethod::Renamed),
        Err(err) => {
            debug!(
                source = ?source,
                dest = ?dest,
                error = %err,
                "rename failed; falling back to copy + delete"
            );
        }
    }

    copy_file(fs, source, dest).map_err(|err| RelocateError::Copy {
        source_path: source.to_path_buf(),
        dest_path: dest.to_path_buf(),
        source: err,
    })?;

    fs.remove_file(source)
        .map_err(|err| RelocateError::Cleanup {
            path: source.to_path_buf(),
            source: err,
        })?;

    Ok(RelocateMethod::Copied)
}

fn copy_file(fs: &dyn FileSystem, source: &Path, dest: &Path) -> io::Result<()> {
    let mut reader = fs.open_read(source)?;
    let mut writer = fs.create_new(dest)?;
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    drop(writer);
    fs.copy_permissions(source, dest)?;
    debug!(source = ?source, dest = ?dest, bytes, "copied file contents");
    Ok(())
}
