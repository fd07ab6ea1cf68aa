// Shared helpers for integration tests.
//
// Provides a temporary dotfiles tree plus a temporary home directory and a
// fluent builder so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotlink::cli::GlobalOpts;

/// An isolated dotfiles tree and home directory, each backed by a
/// [`tempfile::TempDir`] that is deleted on drop.
pub struct IntegrationTestContext {
    /// Temporary dotfiles repository.
    pub root: tempfile::TempDir,
    /// Temporary home directory links are created under.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty dotfiles tree and an empty home.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create root temp dir"),
            home: tempfile::tempdir().expect("create home temp dir"),
        }
    }

    /// Canonical path to the dotfiles root, as the installer resolves it.
    pub fn root_path(&self) -> PathBuf {
        dunce::canonicalize(self.root.path()).expect("canonicalize root")
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Absolute path of a source inside the dotfiles tree.
    pub fn source(&self, rel: &str) -> PathBuf {
        self.root_path().join(rel)
    }

    /// Absolute path of a destination inside the home directory.
    pub fn dest(&self, rel: &str) -> PathBuf {
        self.home.path().join(rel)
    }

    /// Global options pointing at this context.
    pub fn global(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            root: Some(self.root.path().to_path_buf()),
            home: Some(self.home.path().to_path_buf()),
        }
    }

    /// Whether `rel` under home is a symlink pointing at source `src`.
    pub fn is_linked(&self, rel: &str, src: &str) -> bool {
        std::fs::read_link(self.dest(rel)).is_ok_and(|target| target == self.source(src))
    }

    /// Every path under home, relative and sorted, for before/after checks.
    pub fn home_snapshot(&self) -> Vec<String> {
        fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
            let Ok(entries) = std::fs::read_dir(dir) else {
                return;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let rel = path
                    .strip_prefix(base)
                    .expect("strip home prefix")
                    .to_string_lossy()
                    .replace('\\', "/");
                out.push(rel);
                let is_real_dir = entry.file_type().is_ok_and(|t| t.is_dir());
                if is_real_dir {
                    walk(base, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.home.path(), self.home.path(), &mut out);
        out.sort();
        out
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new, empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Create a source file at `rel` inside the dotfiles tree.
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.root.path().join(rel), content);
        self
    }

    /// Create a source directory at `rel` inside the dotfiles tree.
    pub fn with_source_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.root.path().join(rel)).expect("create source dir");
        self
    }

    /// Create a file at `rel` inside the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.home.path().join(rel), content);
        self
    }

    /// Create a directory at `rel` inside the home directory.
    pub fn with_home_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.home.path().join(rel)).expect("create home dir");
        self
    }

    /// Write `dotlink.toml` at the dotfiles root.
    pub fn with_settings(self, content: &str) -> Self {
        write(&self.ctx.root.path().join("dotlink.toml"), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
