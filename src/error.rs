//! Domain-specific error types for the link installer.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`DiscoveryError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! Per-entry failures (unparseable names, backup or link failures) are not
//! errors at all: they are folded into
//! [`LinkOutcome`](crate::links::LinkOutcome) so one bad entry never aborts
//! a run.
//!
//! # Error hierarchy
//!
//! ```text
//! DotlinkError
//! ├── Config(ConfigError)       — dotlink.toml read/parse failures
//! ├── Discovery(DiscoveryError) — the source tree cannot be enumerated
//! └── Setup(SetupError)         — root or home directory cannot be resolved
//! ```

use thiserror::Error;

/// Top-level error type for the link installer.
#[derive(Error, Debug)]
pub enum DotlinkError {
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source discovery failed; fatal for the run.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The environment needed to plan links could not be resolved.
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),
}

/// Errors that arise from loading `dotlink.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or contains unknown keys.
    #[error("Invalid TOML in {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser message.
        message: String,
    },
}

/// Errors that abort discovery of link sources.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A directory in the source tree could not be read.
    #[error("cannot read directory {path}: {source}")]
    Unreadable {
        /// Directory that failed to open or iterate.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The requested root is not a directory.
    #[error("dotfiles root is not a directory: {0}")]
    NotADirectory(String),
}

/// Errors resolving the dotfiles root or the home directory.
#[derive(Error, Debug)]
pub enum SetupError {
    /// No root was given and none could be detected.
    #[error("cannot determine dotfiles root ({0}). Use --root or set DOTLINK_ROOT")]
    RootNotFound(String),

    /// No home directory was given and the environment does not name one.
    #[error("cannot determine home directory. Use --home or set HOME")]
    HomeNotSet,
}
