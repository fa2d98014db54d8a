// src/fs/mock.rs

//! In-memory [`FileSystem`] for tests, with failure injection for the
//! stages of a move (directory creation, rename, copy, source removal).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, Cursor, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{DirEntry, FileSystem};

/// Mode given to files created without an explicit one.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, mode: u32 },
    Dir,
}

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<PathBuf, MockEntry>,
    cross_device: bool,
    deny_create_dir: HashSet<PathBuf>,
    deny_remove: HashSet<PathBuf>,
    write_limits: HashMap<PathBuf, usize>,
    appear_after_check: HashMap<PathBuf, Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `rename` fail as if source and destination were on
    /// different devices, forcing the copy fallback.
    pub fn with_cross_device_renames(self) -> Self {
        self.lock().cross_device = true;
        self
    }

    /// Make `create_dir_all` fail for `path` and anything below it.
    pub fn deny_create_dir(&self, path: impl AsRef<Path>) {
        self.lock().deny_create_dir.insert(path.as_ref().to_path_buf());
    }

    /// Make `remove_file` fail for exactly `path`.
    pub fn deny_remove(&self, path: impl AsRef<Path>) {
        self.lock().deny_remove.insert(path.as_ref().to_path_buf());
    }

    /// Make writes into `path` fail once it holds `bytes` bytes, leaving the
    /// truncated file behind.
    pub fn fail_writes_after(&self, path: impl AsRef<Path>, bytes: usize) {
        self.lock()
            .write_limits
            .insert(path.as_ref().to_path_buf(), bytes);
    }

    /// The next `exists(path)` answers as usual, then a file with `content`
    /// shows up at `path`, as if another process created it right after the
    /// check.
    pub fn create_after_existence_check(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
    ) {
        self.lock()
            .appear_after_check
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        insert_dir_with_parents(&mut state.entries, path.as_ref());
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.add_file_with_mode(path, content, DEFAULT_FILE_MODE);
    }

    pub fn add_file_with_mode(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        mode: u32,
    ) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = non_empty_parent(path) {
            insert_dir_with_parents(&mut state.entries, parent);
        }
        state.entries.insert(
            path.to_path_buf(),
            MockEntry::File {
                content: content.into(),
                mode,
            },
        );
    }

    /// Contents of the file at `path`, if it is a file.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().entries.get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    /// Permission bits of the file at `path`, if it is a file.
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        match self.lock().entries.get(path.as_ref()) {
            Some(MockEntry::File { mode, .. }) => Some(*mode),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn insert_dir_with_parents(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(ErrorKind::NotFound, format!("no such file: {}", path.display()))
}

fn parent_is_dir(entries: &BTreeMap<PathBuf, MockEntry>, path: &Path) -> bool {
    match non_empty_parent(path) {
        Some(parent) => matches!(entries.get(parent), Some(MockEntry::Dir)),
        None => true,
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let mut state = self.lock();
        if let Some(content) = state.appear_after_check.remove(path) {
            let found = state.entries.contains_key(path);
            if let Some(parent) = non_empty_parent(path) {
                insert_dir_with_parents(&mut state.entries, parent);
            }
            state.entries.insert(
                path.to_path_buf(),
                MockEntry::File {
                    content,
                    mode: DEFAULT_FILE_MODE,
                },
            );
            return found;
        }
        state.entries.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Dir) => {}
            Some(MockEntry::File { .. }) => {
                return Err(io::Error::new(
                    ErrorKind::NotADirectory,
                    format!("not a directory: {}", path.display()),
                ));
            }
            None => return Err(not_found(path)),
        }

        let mut children: Vec<DirEntry> = state
            .entries
            .iter()
            .filter(|(child, _)| child.parent() == Some(path))
            .filter_map(|(child, entry)| {
                let file_name = child.file_name()?.to_os_string();
                Some(DirEntry {
                    path: child.clone(),
                    file_name,
                    is_dir: matches!(entry, MockEntry::Dir),
                })
            })
            .collect();
        children.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(children)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if path
            .ancestors()
            .any(|a| state.deny_create_dir.contains(a))
        {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        if let Some(MockEntry::File { .. }) = state.entries.get(path) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("file exists: {}", path.display()),
            ));
        }
        insert_dir_with_parents(&mut state.entries, path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if state.cross_device {
            return Err(io::Error::new(
                ErrorKind::CrossesDevices,
                "invalid cross-device link",
            ));
        }
        if !matches!(state.entries.get(from), Some(MockEntry::File { .. })) {
            return Err(not_found(from));
        }
        if !parent_is_dir(&state.entries, to) {
            return Err(not_found(to));
        }
        if let Some(entry) = state.entries.remove(from) {
            state.entries.insert(to.to_path_buf(), entry);
        }
        Ok(())
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir) => Err(io::Error::new(
                ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn create_new(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let mut state = self.lock();
        if state.entries.contains_key(path) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("file exists: {}", path.display()),
            ));
        }
        if !parent_is_dir(&state.entries, path) {
            return Err(not_found(path));
        }
        state.entries.insert(
            path.to_path_buf(),
            MockEntry::File {
                content: Vec::new(),
                mode: DEFAULT_FILE_MODE,
            },
        );
        Ok(Box::new(MockWriter {
            state: Arc::clone(&self.state),
            path: path.to_path_buf(),
        }))
    }

    fn copy_permissions(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.lock();
        let mode = match state.entries.get(from) {
            Some(MockEntry::File { mode, .. }) => *mode,
            _ => return Err(not_found(from)),
        };
        match state.entries.get_mut(to) {
            Some(MockEntry::File { mode: dest_mode, .. }) => {
                *dest_mode = mode;
                Ok(())
            }
            _ => Err(not_found(to)),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if state.deny_remove.contains(path) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        if !matches!(state.entries.get(path), Some(MockEntry::File { .. })) {
            return Err(not_found(path));
        }
        state.entries.remove(path);
        Ok(())
    }
}

/// Writer returned by `create_new`; appends straight into the shared tree.
struct MockWriter {
    state: Arc<Mutex<MockState>>,
    path: PathBuf,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let limit = state.write_limits.get(&self.path).copied();
        match state.entries.get_mut(&self.path) {
            Some(MockEntry::File { content, .. }) => {
                let room = limit.map_or(buf.len(), |l| l.saturating_sub(content.len()));
                if room == 0 && !buf.is_empty() {
                    return Err(io::Error::new(
                        ErrorKind::StorageFull,
                        format!("no space left on device: {}", self.path.display()),
                    ));
                }
                let n = room.min(buf.len());
                content.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            _ => Err(not_found(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
