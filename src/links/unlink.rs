//! Undo an install: remove our links and put backups back.
use std::path::{Path, PathBuf};

use super::plan::PlanEntry;
use super::safe_link::{DestinationState, backup_path, inspect};
use crate::logging::Log;
use crate::operations::FileSystemOps;

/// How unlinking one plan entry ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlinkOutcome {
    /// The entry had no destination.
    Unparseable,
    /// The destination is not a link to the source; left alone.
    NotLinked,
    /// The link was removed and, if one existed, the backup restored.
    Removed {
        /// Restored path, when a backup was moved back.
        restored: Option<PathBuf>,
    },
    /// Dry run: the link would be removed.
    WouldRemove {
        /// Backup that would be moved back.
        restore: Option<PathBuf>,
    },
    /// Removing the link or restoring the backup failed.
    Failed {
        /// Error description.
        reason: String,
    },
}

/// Result of unlinking one plan entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlinkResult {
    /// Link source.
    pub from: PathBuf,
    /// Link destination.
    pub to: Option<PathBuf>,
    /// Outcome of the operation.
    pub outcome: UnlinkOutcome,
}

/// Remove the link for one entry if it points at the entry's source.
pub fn unlink_entry(
    entry: &PlanEntry,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
    dry_run: bool,
) -> UnlinkResult {
    let outcome = entry.to.as_deref().map_or(UnlinkOutcome::Unparseable, |dest| {
        unlink_dest(&entry.from, dest, fs, log, dry_run)
    });
    UnlinkResult {
        from: entry.from.clone(),
        to: entry.to.clone(),
        outcome,
    }
}

/// Unlink every entry in order, one result per entry.
pub fn unlink_plan(
    plan: &[PlanEntry],
    fs: &dyn FileSystemOps,
    log: &dyn Log,
    dry_run: bool,
) -> Vec<UnlinkResult> {
    plan.iter()
        .map(|entry| unlink_entry(entry, fs, log, dry_run))
        .collect()
}

fn unlink_dest(
    from: &Path,
    dest: &Path,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
    dry_run: bool,
) -> UnlinkOutcome {
    if inspect(from, dest, fs) != DestinationState::Linked {
        log.debug(&format!("skipping {}: not linked to {}", dest.display(), from.display()));
        return UnlinkOutcome::NotLinked;
    }

    let bak = backup_path(dest);
    let restore = fs.entry_kind(&bak).is_some().then_some(bak);

    if dry_run {
        match &restore {
            Some(bak) => log.dry_run(&format!(
                "would remove link {} and restore {}",
                dest.display(),
                bak.display()
            )),
            None => log.dry_run(&format!("would remove link {}", dest.display())),
        }
        return UnlinkOutcome::WouldRemove { restore };
    }

    if let Err(e) = fs.remove_link(dest) {
        log.error(&format!("Failed to remove link: {}: {e}", dest.display()));
        return UnlinkOutcome::Failed {
            reason: e.to_string(),
        };
    }

    let Some(bak) = restore else {
        log.success(&format!("Removed link: {}", dest.display()));
        return UnlinkOutcome::Removed { restored: None };
    };

    match fs.rename(&bak, dest) {
        Ok(()) => {
            log.success(&format!(
                "Removed link: {} (restored from {})",
                dest.display(),
                bak.display()
            ));
            UnlinkOutcome::Removed {
                restored: Some(dest.to_path_buf()),
            }
        }
        Err(e) => {
            log.error(&format!(
                "Removed link {} but failed to restore {}: {e}",
                dest.display(),
                bak.display()
            ));
            UnlinkOutcome::Failed {
                reason: format!("restore {}: {e}", bak.display()),
            }
        }
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::links::safe_link::safe_link;
    use crate::logging::{Level, MemoryLog};
    use crate::operations::{Fault, FaultyFileSystemOps, SystemFileSystemOps};

    fn setup() -> (tempfile::TempDir, PlanEntry) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dots/DOTgitconfig.home.symlink");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "[user]").unwrap();
        let dest = dir.path().join("home/.gitconfig");
        (dir, PlanEntry::new(source, Some(dest)))
    }

    fn dest(entry: &PlanEntry) -> &Path {
        entry.to.as_deref().unwrap()
    }

    #[test]
    fn removes_own_link() {
        let (_dir, entry) = setup();
        safe_link(&entry, &SystemFileSystemOps, &MemoryLog::new());

        let log = MemoryLog::new();
        let result = unlink_entry(&entry, &SystemFileSystemOps, &log, false);
        assert_eq!(result.outcome, UnlinkOutcome::Removed { restored: None });
        assert!(dest(&entry).symlink_metadata().is_err());
        assert!(entry.from.exists(), "source must survive");
        assert!(log.contains(Level::Success, "Removed link"));
    }

    #[test]
    fn restores_backup() {
        let (_dir, entry) = setup();
        std::fs::create_dir_all(dest(&entry).parent().unwrap()).unwrap();
        std::fs::write(dest(&entry), "mine").unwrap();
        safe_link(&entry, &SystemFileSystemOps, &MemoryLog::new());

        let result = unlink_entry(&entry, &SystemFileSystemOps, &MemoryLog::new(), false);
        assert_eq!(
            result.outcome,
            UnlinkOutcome::Removed {
                restored: Some(dest(&entry).to_path_buf())
            }
        );
        assert_eq!(std::fs::read_to_string(dest(&entry)).unwrap(), "mine");
        assert!(!backup_path(dest(&entry)).exists());
    }

    #[test]
    fn leaves_foreign_content_alone() {
        let (_dir, entry) = setup();
        std::fs::create_dir_all(dest(&entry).parent().unwrap()).unwrap();
        std::fs::write(dest(&entry), "not ours").unwrap();

        let fs = FaultyFileSystemOps::failing(&[]);
        let result = unlink_entry(&entry, &fs, &MemoryLog::new(), false);
        assert_eq!(result.outcome, UnlinkOutcome::NotLinked);
        assert!(fs.calls().is_empty());
        assert_eq!(std::fs::read_to_string(dest(&entry)).unwrap(), "not ours");
    }

    #[test]
    fn unparseable_entry() {
        let entry = PlanEntry::new(PathBuf::from("/dots/orphan.symlink"), None);
        let result = unlink_entry(&entry, &SystemFileSystemOps, &MemoryLog::new(), false);
        assert_eq!(result.outcome, UnlinkOutcome::Unparseable);
    }

    #[test]
    fn dry_run_changes_nothing() {
        let (_dir, entry) = setup();
        std::fs::create_dir_all(dest(&entry).parent().unwrap()).unwrap();
        std::fs::write(dest(&entry), "mine").unwrap();
        safe_link(&entry, &SystemFileSystemOps, &MemoryLog::new());

        let fs = FaultyFileSystemOps::failing(&[]);
        let log = MemoryLog::new();
        let results = unlink_plan(std::slice::from_ref(&entry), &fs, &log, true);
        assert_eq!(
            results[0].outcome,
            UnlinkOutcome::WouldRemove {
                restore: Some(backup_path(dest(&entry)))
            }
        );
        assert!(fs.calls().is_empty());
        assert!(dest(&entry).symlink_metadata().unwrap().is_symlink());
        assert!(log.contains(Level::DryRun, "would remove link"));
    }

    #[test]
    fn remove_failure_is_per_entry() {
        let (_dir, entry) = setup();
        safe_link(&entry, &SystemFileSystemOps, &MemoryLog::new());

        let fs = FaultyFileSystemOps::failing(&[Fault::RemoveLink]);
        let log = MemoryLog::new();
        let result = unlink_entry(&entry, &fs, &log, false);
        assert!(matches!(result.outcome, UnlinkOutcome::Failed { .. }));
        assert!(dest(&entry).symlink_metadata().unwrap().is_symlink());
        assert!(log.contains(Level::Error, "Failed to remove link"));
    }

    #[test]
    fn restore_failure_keeps_backup() {
        let (_dir, entry) = setup();
        std::fs::create_dir_all(dest(&entry).parent().unwrap()).unwrap();
        std::fs::write(dest(&entry), "mine").unwrap();
        safe_link(&entry, &SystemFileSystemOps, &MemoryLog::new());

        let fs = FaultyFileSystemOps::failing(&[Fault::Rename]);
        let result = unlink_entry(&entry, &fs, &MemoryLog::new(), false);
        assert!(matches!(result.outcome, UnlinkOutcome::Failed { .. }));
        assert_eq!(
            std::fs::read_to_string(backup_path(dest(&entry))).unwrap(),
            "mine"
        );
    }
}
