// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed link farm with the usual source
// packages, plus helpers for permission tests and plan snapshots.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dploy_cli::api::Options;
use dploy_cli::logging::Log;
use dploy_cli::plan::Plan;

/// A [`Log`] that discards everything.
#[derive(Debug, Default)]
pub struct QuietLog;

impl Log for QuietLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn dry_run(&self, _msg: &str) {}
}

/// An isolated link farm backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `source_a/aaa/{aaa,bbb,ccc}`
/// - `source_b/aaa/{ddd,eee,fff}`
/// - `source_d/aaa/{ggg,hhh}`
/// - `source_only_files/{aaa,bbb}`
/// - `file_a`, `file_b`
/// - `dest/` (empty)
pub struct Farm {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Farm {
    /// Create a farm with the standard layout.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        let farm = Self { _dir: dir, root };
        for file in [
            "source_a/aaa/aaa",
            "source_a/aaa/bbb",
            "source_a/aaa/ccc",
            "source_b/aaa/ddd",
            "source_b/aaa/eee",
            "source_b/aaa/fff",
            "source_d/aaa/ggg",
            "source_d/aaa/hhh",
            "source_only_files/aaa",
            "source_only_files/bbb",
            "file_a",
            "file_b",
        ] {
            farm.write(file, file);
        }
        fs::create_dir(farm.path("dest")).expect("create dest");
        farm
    }

    /// Absolute path of `rel` inside the farm.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Create the file `rel` (and its parents) holding `content`.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write file");
    }

    /// Create the directory `rel` (and its parents).
    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).expect("create dir");
    }

    /// Create a link at `link` storing `target` verbatim.
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, link: &str) {
        std::os::unix::fs::symlink(target, self.path(link)).expect("create symlink");
    }

    /// Absolute paths of the given farm-relative sources.
    pub fn sources(&self, sources: &[&str]) -> Vec<PathBuf> {
        sources.iter().map(|s| self.path(s)).collect()
    }

    /// Whether `rel` is a symbolic link.
    pub fn is_link(&self, rel: &str) -> bool {
        self.path(rel)
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink())
    }

    /// Whether anything (including a dangling link) exists at `rel`.
    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).symlink_metadata().is_ok()
    }

    /// The value stored in the link at `rel`.
    pub fn read_link(&self, rel: &str) -> PathBuf {
        fs::read_link(self.path(rel)).expect("read link")
    }

    /// Sorted names of the entries of the directory `rel`.
    pub fn list(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(rel))
            .expect("read dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Render `plan` one action per line with the farm root replaced by
    /// `<root>`.
    pub fn render(&self, plan: &Plan) -> String {
        plan.render()
            .replace(&self.root.display().to_string(), "<root>")
            .trim_end()
            .to_string()
    }

    /// Stow `sources` into `dest` with default options.
    pub fn stow(&self, sources: &[&str]) {
        dploy_cli::api::stow(
            self.sources(sources).as_slice(),
            self.path("dest"),
            &Options::default(),
            &QuietLog,
        )
        .expect("stow");
    }

    /// Unstow `sources` from `dest` with default options.
    pub fn unstow(&self, sources: &[&str]) {
        dploy_cli::api::unstow(
            self.sources(sources).as_slice(),
            self.path("dest"),
            &Options::default(),
            &QuietLog,
        )
        .expect("unstow");
    }
}

/// Options with the given ignore patterns.
pub fn ignoring(patterns: &[&str]) -> Options {
    Options {
        ignore_patterns: patterns.iter().map(ToString::to_string).collect(),
        ..Options::default()
    }
}

/// Clear the permission bits in `mask` on `path` (following links).
#[cfg(unix)]
pub fn remove_permission(path: &Path, mask: u32) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(perms.mode() & !mask);
    fs::set_permissions(path, perms).expect("set permissions");
}

/// Restore full owner permissions on `path` so the farm can be cleaned up.
#[cfg(unix)]
pub fn restore_permission(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(perms.mode() | 0o700);
    fs::set_permissions(path, perms).expect("set permissions");
}

/// Whether file permissions are enforced for this process.
///
/// Returns `false` when running as root, where permission tests are
/// meaningless.
#[cfg(unix)]
pub fn permissions_enforced() -> bool {
    let dir = tempfile::tempdir().expect("create temp dir");
    remove_permission(dir.path(), 0o200);
    let enforced = fs::write(dir.path().join("probe"), "").is_err();
    restore_permission(dir.path());
    enforced
}
