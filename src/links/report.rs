//! Run summaries.
use super::safe_link::{DestinationState, LinkResult, Preview};
use super::unlink::{UnlinkOutcome, UnlinkResult};
use crate::logging::Log;

/// Wording for one command's summary line.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    /// Label for entries changed by this run.
    pub changed: &'static str,
    /// Label for entries a dry run would change.
    pub pending: &'static str,
    /// Label for entries that were already in the wanted state.
    pub unchanged: &'static str,
}

/// Labels for `install`.
pub const INSTALL_LABELS: Labels = Labels {
    changed: "linked",
    pending: "would link",
    unchanged: "already linked",
};

/// Labels for `unlink`.
pub const UNLINK_LABELS: Labels = Labels {
    changed: "removed",
    pending: "would remove",
    unchanged: "not linked",
};

/// Counters for one run.
///
/// # Examples
///
/// ```
/// use dotlink::links::{INSTALL_LABELS, Summary};
///
/// let stats = Summary { changed: 3, unchanged: 10, pending: 0, failed: 0 };
/// assert_eq!(stats.line(INSTALL_LABELS), "3 linked, 10 already linked");
/// assert!(stats.is_success());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Entries changed by this run.
    pub changed: u32,
    /// Entries already in the wanted state.
    pub unchanged: u32,
    /// Entries a dry run would change.
    pub pending: u32,
    /// Entries that failed, including unparseable ones.
    pub failed: u32,
}

impl Summary {
    /// Tally applied link results.
    #[must_use]
    pub fn of_links(results: &[LinkResult]) -> Self {
        let mut s = Self::default();
        for r in results {
            if r.already_exists() {
                s.unchanged += 1;
            } else if r.success() {
                s.changed += 1;
            } else {
                s.failed += 1;
            }
        }
        s
    }

    /// Tally a dry-run preview.
    #[must_use]
    pub fn of_previews(previews: &[Preview]) -> Self {
        let mut s = Self::default();
        for p in previews {
            match (&p.state, p.backup_blocked) {
                (None, _) | (Some(_), true) => s.failed += 1,
                (Some(DestinationState::Linked), false) => s.unchanged += 1,
                (Some(_), false) => s.pending += 1,
            }
        }
        s
    }

    /// Tally unlink results.
    #[must_use]
    pub fn of_unlinks(results: &[UnlinkResult]) -> Self {
        let mut s = Self::default();
        for r in results {
            match r.outcome {
                UnlinkOutcome::Removed { .. } => s.changed += 1,
                UnlinkOutcome::NotLinked => s.unchanged += 1,
                UnlinkOutcome::WouldRemove { .. } => s.pending += 1,
                UnlinkOutcome::Unparseable | UnlinkOutcome::Failed { .. } => s.failed += 1,
            }
        }
        s
    }

    /// Whether nothing failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Format the summary line (e.g. "3 linked, 10 already linked, 1 failed").
    ///
    /// Zero pending and zero failed counts are omitted.
    #[must_use]
    pub fn line(&self, labels: Labels) -> String {
        let mut parts = vec![
            format!("{} {}", self.changed, labels.changed),
            format!("{} {}", self.unchanged, labels.unchanged),
        ];
        if self.pending > 0 {
            parts.push(format!("{} {}", self.pending, labels.pending));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }

    /// Log the summary line, as an error when anything failed.
    pub fn log(&self, labels: Labels, log: &dyn Log) {
        log.stage("Summary");
        if self.is_success() {
            log.success(&self.line(labels));
        } else {
            log.error(&self.line(labels));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::links::plan::PlanEntry;
    use crate::links::safe_link::LinkOutcome;
    use crate::logging::{Level, MemoryLog};
    use crate::operations::EntryKind;
    use std::path::PathBuf;

    fn link(outcome: LinkOutcome) -> LinkResult {
        LinkResult {
            from: PathBuf::from("/dots/a.home.symlink"),
            to: Some(PathBuf::from("/home/user/a")),
            outcome,
        }
    }

    #[test]
    fn tallies_link_outcomes() {
        let results = vec![
            link(LinkOutcome::Created { backup: None }),
            link(LinkOutcome::Created {
                backup: Some(PathBuf::from("/home/user/a.bak")),
            }),
            link(LinkOutcome::AlreadyLinked),
            link(LinkOutcome::NullDestination),
            link(LinkOutcome::BackupFailed {
                reason: "busy".into(),
            }),
            link(LinkOutcome::CreateFailed {
                reason: "denied".into(),
            }),
        ];
        let s = Summary::of_links(&results);
        assert_eq!(
            s,
            Summary {
                changed: 2,
                unchanged: 1,
                pending: 0,
                failed: 3
            }
        );
        assert!(!s.is_success());
    }

    #[test]
    fn unparseable_entries_always_count_as_failures() {
        let results = vec![
            link(LinkOutcome::NullDestination),
            link(LinkOutcome::NullDestination),
        ];
        assert!(Summary::of_links(&results).failed >= 2);
    }

    #[test]
    fn tallies_previews() {
        let entry = PlanEntry::new(PathBuf::from("/dots/a.home.symlink"), None);
        let preview = |state, backup_blocked| Preview {
            entry: entry.clone(),
            state,
            backup_blocked,
        };
        let previews = vec![
            preview(None, false),
            preview(Some(DestinationState::Linked), false),
            preview(Some(DestinationState::Absent), false),
            preview(
                Some(DestinationState::Occupied {
                    kind: EntryKind::File,
                }),
                true,
            ),
        ];
        assert_eq!(
            Summary::of_previews(&previews),
            Summary {
                changed: 0,
                unchanged: 1,
                pending: 1,
                failed: 2
            }
        );
    }

    #[test]
    fn tallies_unlinks() {
        let unlink = |outcome| UnlinkResult {
            from: PathBuf::from("/dots/a.home.symlink"),
            to: None,
            outcome,
        };
        let results = vec![
            unlink(UnlinkOutcome::Removed { restored: None }),
            unlink(UnlinkOutcome::NotLinked),
            unlink(UnlinkOutcome::WouldRemove { restore: None }),
            unlink(UnlinkOutcome::Unparseable),
        ];
        assert_eq!(
            Summary::of_unlinks(&results),
            Summary {
                changed: 1,
                unchanged: 1,
                pending: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn line_omits_zero_optional_counts() {
        let s = Summary {
            changed: 5,
            unchanged: 12,
            ..Summary::default()
        };
        assert_eq!(s.line(INSTALL_LABELS), "5 linked, 12 already linked");
    }

    #[test]
    fn line_with_pending_and_failed() {
        let s = Summary {
            changed: 0,
            unchanged: 2,
            pending: 3,
            failed: 1,
        };
        insta::assert_snapshot!(
            s.line(INSTALL_LABELS),
            @"0 linked, 2 already linked, 3 would link, 1 failed"
        );
        insta::assert_snapshot!(
            s.line(UNLINK_LABELS),
            @"0 removed, 2 not linked, 3 would remove, 1 failed"
        );
    }

    #[test]
    fn log_uses_error_level_on_failure() {
        let log = MemoryLog::new();
        Summary {
            failed: 1,
            ..Summary::default()
        }
        .log(INSTALL_LABELS, &log);
        assert!(log.contains(Level::Stage, "Summary"));
        assert!(log.contains(Level::Error, "1 failed"));

        let log = MemoryLog::new();
        Summary::default().log(INSTALL_LABELS, &log);
        assert!(log.contains(Level::Success, "0 linked"));
    }
}
