//! Command: print the link plan.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::{GlobalOpts, PlanOpts};
use crate::links::{self, PlanEntry, Summary};
use crate::logging::Log;

/// Print the link plan to stdout without inspecting any destination.
///
/// Unparseable entries are listed and counted as failures.
///
/// # Errors
///
/// Returns an error if setup or discovery fails, or the plan cannot be
/// serialized.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, opts: &PlanOpts, log: &dyn Log) -> Result<Summary> {
    let setup = CommandSetup::init(global, log)?;
    let plan = setup.plan(log)?;
    println!("{}", render(&plan, opts.json)?);

    let failed = plan.iter().filter(|e| e.to.is_none()).count();
    let total = plan.len();
    Ok(Summary {
        pending: u32::try_from(total - failed).unwrap_or(u32::MAX),
        failed: u32::try_from(failed).unwrap_or(u32::MAX),
        ..Summary::default()
    })
}

/// Render the plan as text lines or as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(plan: &[PlanEntry], json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(plan).context("serializing plan")
    } else {
        Ok(links::render_plan(plan).join("\n"))
    }
}
