//! Command: remove installed links and restore backups.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::links::{self, Summary, UNLINK_LABELS};
use crate::logging::Log;
use crate::operations::SystemFileSystemOps;

/// Run the unlink command: remove every link that points at its planned
/// source and restore the backup it replaced.
///
/// # Errors
///
/// Returns an error if the root or home cannot be resolved, `dotlink.toml`
/// is invalid, or the dotfiles tree cannot be read.
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<Summary> {
    log.stage("Resolving paths");
    let setup = CommandSetup::init(global, log)?;

    log.stage("Discovering link sources");
    let plan = setup.plan(log)?;

    log.stage(if global.dry_run {
        "Previewing unlink"
    } else {
        "Removing links"
    });
    let results = links::unlink_plan(&plan, &SystemFileSystemOps, log, global.dry_run);
    let summary = Summary::of_unlinks(&results);
    summary.log(UNLINK_LABELS, log);
    Ok(summary)
}
