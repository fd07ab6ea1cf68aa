//! Enumerate link sources under the dotfiles root.
use std::path::{Path, PathBuf};

use super::transform::LINK_MARKER;
use crate::error::DiscoveryError;

/// Find every regular file or real directory below `root` whose name
/// contains `.symlink`.
///
/// Symlinks inside the tree are neither reported nor followed. Matching
/// directories are still descended into; directories named in `skip_dirs`
/// are not. Children are visited in name order so output is reproducible.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or any directory in the
/// tree cannot be read. There is no partial result: without the full source
/// list no plan is meaningful.
pub fn discover(root: &Path, skip_dirs: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.display().to_string()));
    }
    let mut found = Vec::new();
    walk(root, skip_dirs, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, skip_dirs: &[String], found: &mut Vec<PathBuf>) -> Result<(), DiscoveryError> {
    let unreadable = |source| DiscoveryError::Unreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(unreadable)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(unreadable)?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let file_type = entry.file_type().map_err(unreadable)?;
        if file_type.is_symlink() {
            continue;
        }
        let name = entry.file_name();
        let path = entry.path();

        if is_link_source(&name.to_string_lossy()) {
            found.push(path.clone());
        }
        if file_type.is_dir() && !skip_dirs.iter().any(|s| name == s.as_str()) {
            walk(&path, skip_dirs, found)?;
        }
    }
    Ok(())
}

/// Whether a file name marks a link source.
#[must_use]
pub fn is_link_source(file_name: &str) -> bool {
    file_name.contains(LINK_MARKER)
}
