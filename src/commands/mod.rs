//! Subcommand implementations and the setup they share.
pub mod install;
pub mod plan;
pub mod unlink;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::{DotlinkError, SetupError};
use crate::links::{self, PlanEntry, Summary};
use crate::logging::Log;

/// Environment variable naming the dotfiles root.
pub const ROOT_ENV: &str = "DOTLINK_ROOT";

/// Shared state produced by the common command setup sequence.
///
/// Resolves the dotfiles root, the home directory and `dotlink.toml` so that
/// each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Canonical dotfiles root.
    pub root: PathBuf,
    /// Home directory links are created under.
    pub home: PathBuf,
    /// Settings from `dotlink.toml`, or defaults.
    pub settings: Settings,
}

impl CommandSetup {
    /// Resolve root and home from flags and environment, then load settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or home directory cannot be determined,
    /// or `dotlink.toml` fails to load.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self, DotlinkError> {
        let cwd = std::env::current_dir()
            .map_err(|e| SetupError::RootNotFound(format!("current directory: {e}")))?;
        let root = resolve_root(global.root.as_deref(), std::env::var_os(ROOT_ENV), &cwd)?;
        let home = resolve_home(global.home.as_deref(), home_env())?;
        log.info(&format!("root: {}", root.display()));
        log.info(&format!("home: {}", home.display()));

        let settings = Settings::load(&root)?;
        log.debug(&format!("skip dirs: {}", settings.skip_dirs.join(", ")));

        Ok(Self {
            root,
            home,
            settings,
        })
    }

    /// Discover sources and build the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the source tree cannot be read.
    pub fn plan(&self, log: &dyn Log) -> Result<Vec<PlanEntry>, DotlinkError> {
        let sources = links::discover(&self.root, &self.settings.skip_dirs)?;
        log.debug(&format!("discovered {} link sources", sources.len()));
        Ok(links::build_plan(sources, &self.home, log))
    }
}

/// Turn a finished run into the process result.
///
/// # Errors
///
/// Returns an error naming the failure count when any entry failed.
pub fn ensure_success(summary: &Summary) -> anyhow::Result<()> {
    if !summary.is_success() {
        anyhow::bail!("{} link(s) failed", summary.failed);
    }
    Ok(())
}

/// Resolve the dotfiles root: explicit flag, then `DOTLINK_ROOT`, then the
/// work tree of the git repository containing `cwd`.
///
/// # Errors
///
/// Returns [`SetupError::RootNotFound`] if none of the sources yields an
/// existing directory.
pub fn resolve_root(
    explicit: Option<&Path>,
    env: Option<OsString>,
    cwd: &Path,
) -> Result<PathBuf, SetupError> {
    let candidate = match (explicit, env) {
        (Some(root), _) => root.to_path_buf(),
        (None, Some(root)) if !root.is_empty() => PathBuf::from(root),
        _ => git_work_tree(cwd)?,
    };
    dunce::canonicalize(&candidate)
        .map_err(|e| SetupError::RootNotFound(format!("{}: {e}", candidate.display())))
}

fn git_work_tree(cwd: &Path) -> Result<PathBuf, SetupError> {
    let repo = git2::Repository::discover(cwd)
        .map_err(|e| SetupError::RootNotFound(e.message().to_string()))?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| SetupError::RootNotFound("repository has no work tree".to_string()))
}

/// Resolve the home directory: explicit flag, then the environment.
///
/// # Errors
///
/// Returns [`SetupError::HomeNotSet`] when neither is available.
pub fn resolve_home(explicit: Option<&Path>, env: Option<OsString>) -> Result<PathBuf, SetupError> {
    if let Some(home) = explicit {
        return Ok(home.to_path_buf());
    }
    env.filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(SetupError::HomeNotSet)
}

fn home_env() -> Option<OsString> {
    #[cfg(windows)]
    {
        std::env::var_os("USERPROFILE")
    }
    #[cfg(not(windows))]
    {
        std::env::var_os("HOME")
    }
}
