//! The link engine: from a dotfiles tree to symlinks under the home
//! directory.
pub mod discovery;
pub mod plan;
pub mod repair;
pub mod report;
pub mod safe_link;
pub mod transform;
pub mod unlink;

pub use discovery::discover;
pub use plan::{PlanEntry, build_plan, render_plan};
pub use repair::{RepairOutcome, config_dir, repair_stray_config};
pub use report::{INSTALL_LABELS, Labels, Summary, UNLINK_LABELS};
pub use safe_link::{
    DestinationState, LinkOutcome, LinkResult, Preview, apply_plan, backup_path, inspect,
    preview_plan, safe_link,
};
pub use transform::transform_path;
pub use unlink::{UnlinkOutcome, UnlinkResult, unlink_entry, unlink_plan};
