//! Command: link every source into the home directory.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::links::{self, INSTALL_LABELS, RepairOutcome, Summary};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Run the install command against the real filesystem.
///
/// # Errors
///
/// Returns an error if the root or home cannot be resolved, `dotlink.toml`
/// is invalid, or the dotfiles tree cannot be read. Per-entry failures are
/// counted in the returned [`Summary`] instead.
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<Summary> {
    run_with(global, &SystemFileSystemOps, log)
}

/// Run the install command with an injected filesystem.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(global: &GlobalOpts, fs: &dyn FileSystemOps, log: &dyn Log) -> Result<Summary> {
    log.info(&format!("dotlink {}", super::version::version()));

    log.stage("Resolving paths");
    let setup = CommandSetup::init(global, log)?;

    let mut removed = Vec::new();
    if setup.settings.repair_stray_config {
        log.stage("Checking for stray config directory");
        if links::repair_stray_config(&setup.home, fs, log, global.dry_run)
            == RepairOutcome::WouldRemove
        {
            removed.push(links::config_dir(&setup.home));
        }
    }

    log.stage("Discovering link sources");
    let plan = setup.plan(log)?;
    log.info(&format!("found {} link sources", plan.len()));

    let summary = if global.dry_run {
        log.stage("Previewing links");
        Summary::of_previews(&links::preview_plan(&plan, &removed, fs, log))
    } else {
        log.stage("Linking");
        Summary::of_links(&links::apply_plan(&plan, fs, log))
    };
    summary.log(INSTALL_LABELS, log);
    Ok(summary)
}
