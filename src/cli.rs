//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the dotfiles link installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Link dotfiles into the home directory without clobbering anything",
    version
)]
pub struct Cli {
    /// Subcommand to run; see [`Cli::subcommand`] for the default.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Flags accepted by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The selected subcommand; `install` when none was given.
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command.clone().unwrap_or(Command::Install)
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Override the home directory links are created under
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create links for every source in the dotfiles tree (default)
    Install,
    /// Print the link plan without touching the filesystem
    Plan(PlanOpts),
    /// Remove links created by install and restore backups
    Unlink,
    /// Print version information
    Version,
}

/// Options for the `plan` subcommand.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOpts {
    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Plan(_) => "plan",
            Self::Unlink => "unlink",
            Self::Version => "version",
        }
    }
}
