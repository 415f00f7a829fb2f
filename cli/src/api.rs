//! Library entry points: plan, refuse on conflicts, execute.
//!
//! ```no_run
//! use dploy_cli::api::{self, Options};
//! use dploy_cli::logging::Logger;
//!
//! let log = Logger::new();
//! let options = Options::default();
//! api::stow(&["pkg/vim", "pkg/git"], "/home/me", &options, &log)?;
//! # Ok::<(), dploy_cli::error::DployError>(())
//! ```
use std::path::Path;

use crate::error::DployError;
use crate::execute::{self, Summary};
use crate::logging::Log;
use crate::plan::{self, Conflict, Plan};

/// Options shared by every operation.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Report actions without performing them.
    pub dry_run: bool,
    /// Glob patterns of source entries to leave out.
    pub ignore_patterns: Vec<String>,
}

/// Result of a successful operation.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// What execution did.
    pub summary: Summary,
    /// Conflicts reported without blocking execution (unstow only).
    pub conflicts: Vec<Conflict>,
}

/// Link the contents of every source into `destination`.
///
/// Nothing is changed unless the whole plan is free of conflicts.
///
/// # Errors
///
/// Returns [`DployError::Validation`] for bad roots or patterns,
/// [`DployError::Conflicts`] when planning found conflicts,
/// [`DployError::Plan`] when the trees cannot be inspected and
/// [`DployError::Execution`] when an action fails.
pub fn stow<P: AsRef<Path>>(
    sources: &[P],
    destination: impl AsRef<Path>,
    options: &Options,
    log: &dyn Log,
) -> Result<Outcome, DployError> {
    let plan = plan::plan_stow(sources, destination.as_ref(), &options.ignore_patterns, log)?;
    run(plan, options, log)
}

/// Remove the links of every source from `destination`.
///
/// Conflicts are reported in [`Outcome::conflicts`] and never block the
/// removal of unrelated links.
///
/// # Errors
///
/// Same as [`stow`], except that conflicts alone never fail an unstow.
pub fn unstow<P: AsRef<Path>>(
    sources: &[P],
    destination: impl AsRef<Path>,
    options: &Options,
    log: &dyn Log,
) -> Result<Outcome, DployError> {
    let plan = plan::plan_unstow(sources, destination.as_ref(), &options.ignore_patterns, log)?;
    run(plan, options, log)
}

/// Create a single link at `destination` pointing at `source`.
///
/// Succeeds without changes when the identical link already exists. Ignore
/// patterns do not apply.
///
/// # Errors
///
/// Returns [`DployError::Validation`] when `source` does not exist and
/// [`DployError::Conflicts`] when `destination` is occupied or its parent is
/// missing.
pub fn link(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &Options,
    log: &dyn Log,
) -> Result<Outcome, DployError> {
    let plan = plan::plan_link(source.as_ref(), destination.as_ref(), log)?;
    run(plan, options, log)
}

fn run(plan: Plan, options: &Options, log: &dyn Log) -> Result<Outcome, DployError> {
    let operation = plan.operation;
    if plan.aborted {
        return Err(DployError::Conflicts {
            operation,
            count: plan.conflicts.len(),
        });
    }
    let summary = execute::execute(&plan, options.dry_run, log)
        .map_err(|source| DployError::Execution { operation, source })?;
    Ok(Outcome {
        summary,
        conflicts: plan.conflicts,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::error::Operation;
    use crate::logging::test_helpers::RecordingLog;

    fn farm() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("a/aaa")).unwrap();
        fs::write(root.join("a/aaa/aaa"), "a").unwrap();
        fs::create_dir(root.join("dest")).unwrap();
        (dir, root)
    }

    #[test]
    fn stow_then_unstow_round_trips() {
        let (_dir, root) = farm();
        let log = RecordingLog::new();
        let options = Options::default();

        let outcome = stow(&[root.join("a")], root.join("dest"), &options, &log).unwrap();
        assert_eq!(outcome.summary.applied, 1);
        assert!(root.join("dest/aaa/aaa").is_file());

        let outcome = unstow(&[root.join("a")], root.join("dest"), &options, &log).unwrap();
        assert_eq!(outcome.summary.applied, 1);
        assert_eq!(fs::read_dir(root.join("dest")).unwrap().count(), 0);
    }

    #[test]
    fn conflicting_stow_changes_nothing() {
        let (_dir, root) = farm();
        fs::write(root.join("dest/aaa"), "occupied").unwrap();

        let err = stow(
            &[root.join("a")],
            root.join("dest"),
            &Options::default(),
            &RecordingLog::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DployError::Conflicts {
                operation: Operation::Stow,
                count: 1
            }
        ));
        assert_eq!(fs::read_to_string(root.join("dest/aaa")).unwrap(), "occupied");
    }

    #[test]
    fn unstow_returns_conflicts() {
        let (_dir, root) = farm();
        fs::write(root.join("dest/aaa"), "occupied").unwrap();

        let outcome = unstow(
            &[root.join("a")],
            root.join("dest"),
            &Options::default(),
            &RecordingLog::new(),
        )
        .unwrap();

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.summary.applied, 0);
    }

    #[test]
    fn dry_run_stow_reports_without_linking() {
        let (_dir, root) = farm();
        let log = RecordingLog::new();
        let options = Options {
            dry_run: true,
            ..Options::default()
        };

        let outcome = stow(&[root.join("a")], root.join("dest"), &options, &log).unwrap();

        assert!(outcome.summary.dry_run);
        assert_eq!(log.dry_runs().len(), 1);
        assert!(root.join("dest/aaa").symlink_metadata().is_err());
    }

    #[test]
    fn link_is_idempotent() {
        let (_dir, root) = farm();
        let options = Options::default();
        let log = RecordingLog::new();

        let first = link(root.join("a/aaa/aaa"), root.join("dest/x"), &options, &log).unwrap();
        let second = link(root.join("a/aaa/aaa"), root.join("dest/x"), &options, &log).unwrap();

        assert_eq!(first.summary.applied, 1);
        assert_eq!(second.summary.applied, 0);
        assert_eq!(second.summary.already_correct, 1);
    }
}
