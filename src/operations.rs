//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that link logic can be exercised
//! against failure modes that are hard to provoke on a real filesystem.
//! Production code uses [`SystemFileSystemOps`]; unit tests wrap it in
//! `FaultyFileSystemOps` to make chosen operations fail.

use std::io;
use std::path::{Path, PathBuf};

/// What kind of entry lives at a path, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or anything that is neither a directory nor a symlink).
    File,
    /// A real directory.
    Dir,
    /// A symbolic link, whether or not its target exists.
    Symlink,
}

/// Abstraction over the filesystem calls made by the link engine.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Classify the entry at `path` without following symlinks.
    ///
    /// Returns `None` when nothing exists at `path` (a broken symlink still
    /// counts as [`EntryKind::Symlink`]).
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Return the file names of the immediate children of `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be opened or iterated.
    fn read_dir_names(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Rename `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create `dir` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Remove the symbolic link at `path` (never its target).
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Recursively remove the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let meta = std::fs::symlink_metadata(path).ok()?;
        let kind = if meta.is_symlink() {
            EntryKind::Symlink
        } else if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Some(kind)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn read_dir_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        std::fs::read_dir(dir)?
            .map(|e| e.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        create_symlink(target, link)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        remove_symlink(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`; the raw
/// `FILE_ATTRIBUTE_DIRECTORY` bit tells them apart because
/// `symlink_metadata().is_dir()` is `false` for every symlink.
fn remove_symlink(path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        let meta = std::fs::symlink_metadata(path)?;
        if meta.file_attributes() & 0x10 != 0 {
            return std::fs::remove_dir(path);
        }
    }
    std::fs::remove_file(path)
}

/// Which operation a [`FaultyFileSystemOps`] should fail.
/// An operation [`FaultyFileSystemOps`] can be told to fail.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `rename`
    Rename,
    /// `create_dir_all`
    CreateDir,
    /// `symlink`
    Symlink,
    /// `remove_link`
    RemoveLink,
    /// `remove_dir_all`
    RemoveDir,
    /// `read_dir_names`
    ReadDir,
}

/// Real filesystem with selected operations forced to fail.
///
/// Every call that is not listed in `faults` is delegated to
/// [`SystemFileSystemOps`], so tests run against real temp directories while
/// still reaching the error branches.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FaultyFileSystemOps {
    faults: Vec<Fault>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl FaultyFileSystemOps {
    /// Fail every operation in `faults`; delegate the rest.
    #[must_use]
    pub fn failing(faults: &[Fault]) -> Self {
        Self {
            faults: faults.to_vec(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Names of the mutating operations attempted so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    fn gate(&self, fault: Fault, name: &str) -> io::Result<()> {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(name.to_string());
        }
        if self.faults.contains(&fault) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected {name} failure"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl FileSystemOps for FaultyFileSystemOps {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        SystemFileSystemOps.entry_kind(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        SystemFileSystemOps.read_link(path)
    }

    fn read_dir_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.gate(Fault::ReadDir, "read_dir")?;
        SystemFileSystemOps.read_dir_names(dir)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.gate(Fault::Rename, "rename")?;
        SystemFileSystemOps.rename(from, to)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        self.gate(Fault::CreateDir, "create_dir_all")?;
        SystemFileSystemOps.create_dir_all(dir)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.gate(Fault::Symlink, "symlink")?;
        SystemFileSystemOps.symlink(target, link)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        self.gate(Fault::RemoveLink, "remove_link")?;
        SystemFileSystemOps.remove_link(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.gate(Fault::RemoveDir, "remove_dir_all")?;
        SystemFileSystemOps.remove_dir_all(path)
    }
}
