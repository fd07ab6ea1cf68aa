//! Removal of a stray `~/.config` created by a tool before the dotfiles
//! were linked.
//!
//! A tool manager run early on a fresh machine can create `~/.config/mise/`
//! as a real directory. That would make the `.config` link source back up a
//! directory that holds nothing of the user's, so it is removed first.
use std::path::{Path, PathBuf};

use crate::logging::Log;
use crate::operations::{EntryKind, FileSystemOps};

/// Name of the only child a removable `~/.config` may have.
const STRAY_CHILD: &str = "mise";

/// Result of a repair check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Nothing to repair.
    Untouched,
    /// The stray directory was removed.
    Removed,
    /// Dry run: the stray directory would be removed.
    WouldRemove,
    /// Removal was attempted and failed.
    Failed {
        /// Error description.
        reason: String,
    },
}

/// The directory [`repair_stray_config`] may remove.
#[must_use]
pub fn config_dir(home: &Path) -> PathBuf {
    home.join(".config")
}

/// Remove `{home}/.config` if it is a real directory whose only non-hidden
/// entry is the directory `mise`.
pub fn repair_stray_config(
    home: &Path,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
    dry_run: bool,
) -> RepairOutcome {
    let config = config_dir(home);
    if !is_stray(&config, fs, log) {
        return RepairOutcome::Untouched;
    }

    if dry_run {
        log.dry_run(&format!(
            "would remove {} (contains only {STRAY_CHILD}/)",
            config.display()
        ));
        return RepairOutcome::WouldRemove;
    }

    log.info(&format!(
        "Removing {} (contains only {STRAY_CHILD}/)",
        config.display()
    ));
    match fs.remove_dir_all(&config) {
        Ok(()) => RepairOutcome::Removed,
        Err(e) => {
            log.error(&format!("Failed to remove {}: {e}", config.display()));
            RepairOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn is_stray(config: &Path, fs: &dyn FileSystemOps, log: &dyn Log) -> bool {
    if fs.entry_kind(config) != Some(EntryKind::Dir) {
        return false;
    }
    let names = match fs.read_dir_names(config) {
        Ok(names) => names,
        Err(e) => {
            log.debug(&format!("cannot inspect {}: {e}", config.display()));
            return false;
        }
    };
    let visible: Vec<&String> = names.iter().filter(|n| !n.starts_with('.')).collect();
    matches!(visible.as_slice(), [only] if only.as_str() == STRAY_CHILD)
        && fs.entry_kind(&config.join(STRAY_CHILD)) == Some(EntryKind::Dir)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::{Level, MemoryLog};
    use crate::operations::{Fault, FaultyFileSystemOps, SystemFileSystemOps};

    fn home_with(children: &[&str]) -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        for child in children {
            std::fs::create_dir_all(home.path().join(".config").join(child)).unwrap();
        }
        home
    }

    #[test]
    fn removes_config_holding_only_mise() {
        let home = home_with(&["mise"]);
        let log = MemoryLog::new();
        let outcome = repair_stray_config(home.path(), &SystemFileSystemOps, &log, false);
        assert_eq!(outcome, RepairOutcome::Removed);
        assert!(!home.path().join(".config").exists());
        assert!(log.contains(Level::Info, "Removing"));
    }

    #[test]
    fn hidden_entries_do_not_count() {
        let home = home_with(&["mise", ".cache"]);
        let outcome = repair_stray_config(home.path(), &SystemFileSystemOps, &MemoryLog::new(), false);
        assert_eq!(outcome, RepairOutcome::Removed);
    }

    #[test]
    fn other_content_is_left_alone() {
        let home = home_with(&["mise", "nvim"]);
        let outcome = repair_stray_config(home.path(), &SystemFileSystemOps, &MemoryLog::new(), false);
        assert_eq!(outcome, RepairOutcome::Untouched);
        assert!(home.path().join(".config/nvim").is_dir());
    }

    #[test]
    fn mise_as_file_is_left_alone() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(home.path().join(".config")).unwrap();
        std::fs::write(home.path().join(".config/mise"), "").unwrap();
        let outcome = repair_stray_config(home.path(), &SystemFileSystemOps, &MemoryLog::new(), false);
        assert_eq!(outcome, RepairOutcome::Untouched);
    }

    #[test]
    fn missing_config_is_untouched() {
        let home = tempfile::tempdir().unwrap();
        let fs = FaultyFileSystemOps::failing(&[]);
        let outcome = repair_stray_config(home.path(), &fs, &MemoryLog::new(), false);
        assert_eq!(outcome, RepairOutcome::Untouched);
        assert!(fs.calls().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_config_is_untouched() {
        let home = tempfile::tempdir().unwrap();
        let real = home.path().join("real-config");
        std::fs::create_dir_all(real.join("mise")).unwrap();
        std::os::unix::fs::symlink(&real, home.path().join(".config")).unwrap();

        let outcome = repair_stray_config(home.path(), &SystemFileSystemOps, &MemoryLog::new(), false);
        assert_eq!(outcome, RepairOutcome::Untouched);
        assert!(real.join("mise").is_dir());
    }

    #[test]
    fn dry_run_only_reports() {
        let home = home_with(&["mise"]);
        let log = MemoryLog::new();
        let outcome = repair_stray_config(home.path(), &SystemFileSystemOps, &log, true);
        assert_eq!(outcome, RepairOutcome::WouldRemove);
        assert!(home.path().join(".config/mise").is_dir());
        assert!(log.contains(Level::DryRun, "would remove"));
    }

    #[test]
    fn removal_failure_is_reported() {
        let home = home_with(&["mise"]);
        let fs = FaultyFileSystemOps::failing(&[Fault::RemoveDir]);
        let log = MemoryLog::new();
        let outcome = repair_stray_config(home.path(), &fs, &log, false);
        assert!(matches!(outcome, RepairOutcome::Failed { .. }));
        assert!(log.contains(Level::Error, "Failed to remove"));
    }

    #[test]
    fn unreadable_config_is_untouched() {
        let home = home_with(&["mise"]);
        let fs = FaultyFileSystemOps::failing(&[Fault::ReadDir]);
        let outcome = repair_stray_config(home.path(), &fs, &MemoryLog::new(), false);
        assert_eq!(outcome, RepairOutcome::Untouched);
        assert!(home.path().join(".config/mise").is_dir());
    }
}
