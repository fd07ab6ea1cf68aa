//! Dotfiles link installer.
//!
//! Finds every file or directory in a dotfiles tree whose name follows the
//! `{name}.home[.{segment}]*.symlink[.{ext}]` convention, derives its
//! destination under the home directory from the name alone, and links it
//! there. Anything already occupying a destination is renamed to
//! `<dest>.bak` first, so no user file is ever silently replaced.
//!
//! The public API is organised into three layers:
//!
//! - **[`links`]**: naming convention, discovery, planning and the
//!   conflict-safe link state machine
//! - **[`operations`]**: the filesystem seam the link engine runs against
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `plan`, `unlink`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod links;
pub mod logging;
pub mod operations;
