//! Filename → destination path mapping.
//!
//! A link source encodes its destination in its own name:
//!
//! ```text
//! {name}[.DOT{x}]*.home[.{segment}]*.symlink[.{ext}]
//! ```
//!
//! Segments between `.home` and `.symlink` become directories under the home
//! directory, and the `DOT` token stands for a literal `.` wherever a real dot
//! would be read as a separator.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Marker separating the file name from the destination directory.
pub const HOME_MARKER: &str = ".home";
/// Marker that makes a file a link source at all.
pub const LINK_MARKER: &str = ".symlink";
/// Token standing for a literal `.` in names and directory segments.
pub const DOT_TOKEN: &str = "DOT";

/// Map a link source file name to its absolute destination under `home`.
///
/// Returns `None` when the name carries no `.home` marker; callers treat that
/// as "not a link source" rather than as an error.
///
/// # Examples
///
/// ```
/// use dotlink::links::transform_path;
/// use std::path::{Path, PathBuf};
///
/// let home = Path::new("/Users/me");
/// assert_eq!(
///     transform_path(home, "CLAUDE.home.DOTclaude.symlink.md"),
///     Some(PathBuf::from("/Users/me/.claude/CLAUDE.md"))
/// );
/// assert_eq!(transform_path(home, "random-file.txt"), None);
/// ```
#[must_use]
pub fn transform_path(home: &Path, file_name: &str) -> Option<PathBuf> {
    if !file_name.contains(HOME_MARKER) {
        return None;
    }

    let extension = extension_of(file_name);
    let base = file_name
        .find(LINK_MARKER)
        .map_or(file_name, |i| &file_name[..i]);

    // Everything after the first `.home` is the directory part, even if it
    // contains `.home` again.
    let (name_part, path_part) = base.split_once(HOME_MARKER).unwrap_or((base, ""));
    let name = name_part.replace(DOT_TOKEN, ".");
    let path_part = path_part.strip_prefix('.').unwrap_or(path_part);
    let directory = directory_fragment(path_part);

    let mut dest = OsString::from(home.as_os_str());
    dest.push(directory);
    dest.push("/");
    dest.push(name);
    dest.push(extension);
    Some(PathBuf::from(dest))
}

/// Text after the last `symlink` token, e.g. `.md` or empty.
fn extension_of(file_name: &str) -> &str {
    let token = &LINK_MARKER[1..];
    file_name
        .rfind(token)
        .map_or("", |i| &file_name[i + token.len()..])
}

/// Turn `DOTconfig.nvim` into `/.config/nvim`; empty input stays empty.
fn directory_fragment(path_part: &str) -> String {
    if path_part.is_empty() {
        return String::new();
    }
    format!("/{}", path_part.replace('.', "/").replace(DOT_TOKEN, "."))
}
