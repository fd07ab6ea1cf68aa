//! Plan building: source paths to (source, destination) pairs.
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::transform::transform_path;
use crate::logging::Log;

/// One proposed link, possibly without a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    /// Absolute path of the link source inside the dotfiles tree.
    pub from: PathBuf,
    /// Absolute destination, or `None` when the file name could not be parsed.
    pub to: Option<PathBuf>,
}

impl PlanEntry {
    /// Create a plan entry.
    #[must_use]
    pub const fn new(from: PathBuf, to: Option<PathBuf>) -> Self {
        Self { from, to }
    }

    /// File name of the source, for messages.
    #[must_use]
    pub fn source_name(&self) -> String {
        self.from
            .file_name()
            .map_or_else(|| self.from.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Map every source to its destination under `home`.
///
/// Unparseable names, including names that are not valid UTF-8, are warned
/// about and kept with `to: None` so they are counted as failures later.
#[must_use]
pub fn build_plan(sources: Vec<PathBuf>, home: &Path, log: &dyn Log) -> Vec<PlanEntry> {
    sources
        .into_iter()
        .map(|from| {
            let to = from
                .file_name()
                .and_then(OsStr::to_str)
                .and_then(|name| transform_path(home, name));
            let entry = PlanEntry::new(from, to);
            match &entry.to {
                Some(dest) => log.debug(&format!(
                    "planned {} -> {}",
                    dest.display(),
                    entry.from.display()
                )),
                None => log.warn(&format!(
                    "Could not parse filename pattern: {}",
                    entry.source_name()
                )),
            }
            entry
        })
        .collect()
}

/// Render the plan as one line per entry (`dest <- source`).
#[must_use]
pub fn render_plan(plan: &[PlanEntry]) -> Vec<String> {
    plan.iter()
        .map(|entry| match &entry.to {
            Some(dest) => format!("{} <- {}", dest.display(), entry.from.display()),
            None => format!("<unparseable> <- {}", entry.from.display()),
        })
        .collect()
}
