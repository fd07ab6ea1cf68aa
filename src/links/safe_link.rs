//! Conflict-safe link creation.
//!
//! Each plan entry goes through the same ordered checks:
//!
//! 1. no destination: nothing to do, counted as a failure;
//! 2. destination is a symlink: already ours is a no-op, anything else is
//!    renamed to `<dest>.bak`;
//! 3. destination is any other existing entry: renamed to `<dest>.bak`;
//! 4. parent directories are created and the link is made.
//!
//! A user file is never replaced without first surviving as `<dest>.bak`,
//! and an earlier backup is never overwritten.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::plan::PlanEntry;
use crate::logging::Log;
use crate::operations::{EntryKind, FileSystemOps};

/// Suffix appended to a destination to form its backup path.
pub const BACKUP_SUFFIX: &str = ".bak";

/// What currently occupies a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing exists there.
    Absent,
    /// A symlink that already points at the source.
    Linked,
    /// A symlink pointing somewhere else (`None` if it could not be read).
    ForeignLink {
        /// Current link target.
        current: Option<PathBuf>,
    },
    /// A regular file or real directory.
    Occupied {
        /// Kind of the existing entry.
        kind: EntryKind,
    },
}

/// How applying one plan entry ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The entry had no destination.
    NullDestination,
    /// The destination already linked to the source; nothing was touched.
    AlreadyLinked,
    /// The existing destination could not be moved aside.
    BackupFailed {
        /// Error chain of the failure.
        reason: String,
    },
    /// The link was created, possibly after a backup.
    Created {
        /// Where the previous occupant was moved, if there was one.
        backup: Option<PathBuf>,
    },
    /// Creating the parent directory or the link failed.
    CreateFailed {
        /// Error chain of the failure.
        reason: String,
    },
}

/// Immutable record of one applied plan entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResult {
    /// Link source.
    pub from: PathBuf,
    /// Link destination, `None` for unparseable entries.
    pub to: Option<PathBuf>,
    /// Outcome of the operation.
    pub outcome: LinkOutcome,
}

impl LinkResult {
    fn new(entry: &PlanEntry, outcome: LinkOutcome) -> Self {
        Self {
            from: entry.from.clone(),
            to: entry.to.clone(),
            outcome,
        }
    }

    /// Whether the destination now links to the source.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(
            self.outcome,
            LinkOutcome::AlreadyLinked | LinkOutcome::Created { .. }
        )
    }

    /// Whether the link was already correct before this run.
    #[must_use]
    pub const fn already_exists(&self) -> bool {
        matches!(self.outcome, LinkOutcome::AlreadyLinked)
    }
}

/// Classify `dest` relative to the source `from` without changing anything.
#[must_use]
pub fn inspect(from: &Path, dest: &Path, fs: &dyn FileSystemOps) -> DestinationState {
    match fs.entry_kind(dest) {
        None => DestinationState::Absent,
        Some(EntryKind::Symlink) => match fs.read_link(dest) {
            Ok(current) if paths_equal(&current, from) => DestinationState::Linked,
            Ok(current) => DestinationState::ForeignLink {
                current: Some(current),
            },
            Err(_) => DestinationState::ForeignLink { current: None },
        },
        Some(kind) => DestinationState::Occupied { kind },
    }
}

/// Path that an existing destination is renamed to.
#[must_use]
pub fn backup_path(dest: &Path) -> PathBuf {
    let mut bak = OsString::from(dest.as_os_str());
    bak.push(BACKUP_SUFFIX);
    PathBuf::from(bak)
}

/// Apply one plan entry.
///
/// Every filesystem failure is turned into an outcome; this never returns an
/// error, so the caller can move on to the next entry.
pub fn safe_link(entry: &PlanEntry, fs: &dyn FileSystemOps, log: &dyn Log) -> LinkResult {
    let Some(dest) = entry.to.as_deref() else {
        return LinkResult::new(entry, LinkOutcome::NullDestination);
    };
    let from = entry.from.as_path();

    let backup = match inspect(from, dest, fs) {
        DestinationState::Linked => {
            log.success(&format!(
                "Link already exists: {} -> {}",
                dest.display(),
                from.display()
            ));
            return LinkResult::new(entry, LinkOutcome::AlreadyLinked);
        }
        DestinationState::Absent => None,
        DestinationState::ForeignLink { current } => {
            log.warn(&format!(
                "Existing link {} points to {}. Backing up...",
                dest.display(),
                describe_target(current.as_deref())
            ));
            match back_up(dest, fs) {
                Ok(bak) => Some(bak),
                Err(e) => {
                    log.error(&format!(
                        "Failed to back up existing link: {}: {e:#}",
                        dest.display()
                    ));
                    return LinkResult::new(
                        entry,
                        LinkOutcome::BackupFailed {
                            reason: format!("{e:#}"),
                        },
                    );
                }
            }
        }
        DestinationState::Occupied { .. } => {
            log.warn(&format!(
                "Existing file {} found. Backing up to {}",
                dest.display(),
                backup_path(dest).display()
            ));
            match back_up(dest, fs) {
                Ok(bak) => Some(bak),
                Err(e) => {
                    log.error(&format!(
                        "Failed to back up existing file: {}: {e:#}",
                        dest.display()
                    ));
                    return LinkResult::new(
                        entry,
                        LinkOutcome::BackupFailed {
                            reason: format!("{e:#}"),
                        },
                    );
                }
            }
        }
    };

    let outcome = match create_link(from, dest, fs) {
        Ok(()) => {
            log.success(&format!(
                "Created link: {} -> {}",
                dest.display(),
                from.display()
            ));
            LinkOutcome::Created { backup }
        }
        Err(e) => {
            log.error(&format!(
                "Failed to create link: {} -> {}: {e:#}",
                dest.display(),
                from.display()
            ));
            LinkOutcome::CreateFailed {
                reason: format!("{e:#}"),
            }
        }
    };
    LinkResult::new(entry, outcome)
}

/// Apply every entry in order, one result per entry.
pub fn apply_plan(plan: &[PlanEntry], fs: &dyn FileSystemOps, log: &dyn Log) -> Vec<LinkResult> {
    plan.iter().map(|entry| safe_link(entry, fs, log)).collect()
}

/// What a dry run found for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// The inspected entry.
    pub entry: PlanEntry,
    /// Destination state; `None` for unparseable entries.
    pub state: Option<DestinationState>,
    /// A backup would be needed but `<dest>.bak` is already taken.
    pub backup_blocked: bool,
}

/// Report what [`apply_plan`] would do, touching nothing.
///
/// `removed` lists paths an earlier dry-run step would have deleted; any
/// destination at or below one of them is previewed as [`DestinationState::Absent`].
pub fn preview_plan(
    plan: &[PlanEntry],
    removed: &[PathBuf],
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> Vec<Preview> {
    plan.iter()
        .map(|entry| {
            let Some(dest) = entry.to.as_deref() else {
                return Preview {
                    entry: entry.clone(),
                    state: None,
                    backup_blocked: false,
                };
            };
            let state = if removed.iter().any(|r| dest.starts_with(r)) {
                DestinationState::Absent
            } else {
                inspect(&entry.from, dest, fs)
            };
            let needs_backup = matches!(
                state,
                DestinationState::ForeignLink { .. } | DestinationState::Occupied { .. }
            );
            let backup_blocked = needs_backup && fs.entry_kind(&backup_path(dest)).is_some();

            let link = format!("{} -> {}", dest.display(), entry.from.display());
            if backup_blocked {
                log.error(&format!(
                    "would fail: {} already exists ({link})",
                    backup_path(dest).display()
                ));
            } else {
                match &state {
                    DestinationState::Linked => log.debug(&format!("ok: {link} (already linked)")),
                    DestinationState::Absent => log.dry_run(&format!("would link {link}")),
                    DestinationState::ForeignLink { current } => log.dry_run(&format!(
                        "would back up link to {} and link {link}",
                        describe_target(current.as_deref())
                    )),
                    DestinationState::Occupied { .. } => log.dry_run(&format!(
                        "would back up {} and link {link}",
                        dest.display()
                    )),
                }
            }

            Preview {
                entry: entry.clone(),
                state: Some(state),
                backup_blocked,
            }
        })
        .collect()
}

/// Move `dest` to its backup path, refusing to clobber an older backup.
fn back_up(dest: &Path, fs: &dyn FileSystemOps) -> Result<PathBuf> {
    let bak = backup_path(dest);
    if fs.entry_kind(&bak).is_some() {
        anyhow::bail!("backup path {} already exists", bak.display());
    }
    fs.rename(dest, &bak)
        .with_context(|| format!("rename {} to {}", dest.display(), bak.display()))?;
    Ok(bak)
}

fn create_link(from: &Path, dest: &Path, fs: &dyn FileSystemOps) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs.create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    fs.symlink(from, dest)
        .with_context(|| format!("create link: {}", dest.display()))
}

fn describe_target(current: Option<&Path>) -> String {
    current.map_or_else(|| "an unreadable target".to_string(), |p| p.display().to_string())
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
pub(super) fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    s.strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from)
}
