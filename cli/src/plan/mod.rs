//! Planning: validate the roots, walk the trees and produce a [`Plan`].
//!
//! Planning never mutates the destination. Stow and unstow share one walk
//! over each source tree; they differ only in how each classified entry is
//! turned into actions. Every action is applied to an in-memory overlay of
//! the destination as soon as it is planned, so later sources of the same
//! invocation see the effect of earlier ones (a link planned for `a` is
//! unfolded when `b` needs the same directory, a directory emptied while
//! unstowing `a` is folded before `b` is looked at).
mod classify;
mod state;
mod walk;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::actions::Action;
use crate::error::{DployError, Operation, ValidationError};
use crate::ignore::IgnoreRules;
use crate::logging::Log;
use crate::paths;

use walk::{Planner, SourceTree};

/// Why a destination entry could not be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A regular file occupies the destination.
    ExistingFile,
    /// A directory occupies the destination but the source is not one.
    ExistingDirectory,
    /// A link to somewhere else occupies the destination.
    ExistingLink,
    /// A dangling link occupies the destination.
    BrokenLink,
    /// The destination's parent directory does not exist.
    MissingParent,
}

impl ConflictKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::ExistingFile => "a file already exists at",
            Self::ExistingDirectory => "a directory already exists at",
            Self::ExistingLink => "a link to another location already exists at",
            Self::BrokenLink => "a broken link already exists at",
            Self::MissingParent => "no parent directory exists for",
        }
    }
}

/// A destination entry that is neither already correct nor safe to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Operation that found the conflict.
    pub operation: Operation,
    /// What is in the way.
    pub kind: ConflictKind,
    /// Source entry that maps onto the destination.
    pub source: PathBuf,
    /// Conflicting destination path.
    pub destination: PathBuf,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dploy {op}: cannot {op} '{}': {} '{}'",
            self.source.display(),
            self.kind.describe(),
            self.destination.display(),
            op = self.operation,
        )
    }
}

/// The ordered actions of one invocation, plus what got in the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Operation this plan implements.
    pub operation: Operation,
    /// Actions in execution order.
    pub actions: Vec<Action>,
    /// Conflicts reported while planning, in walk order.
    pub conflicts: Vec<Conflict>,
    /// Set when a conflict forbids executing any action.
    pub aborted: bool,
}

impl Plan {
    /// Number of actions that would change the filesystem.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.actions.iter().filter(|a| !a.is_noop()).count()
    }

    /// Multi-line rendering, one action description per line.
    #[must_use]
    pub fn render(&self) -> String {
        self.actions
            .iter()
            .map(|action| action.description() + "\n")
            .collect()
    }
}

/// Plan merging every source tree into `destination`.
///
/// Conflicts do not stop the walk: all of them are collected and the plan is
/// marked aborted.
///
/// # Errors
///
/// Returns [`DployError::Validation`] when a root is not a directory, a
/// source is the destination, or an ignore pattern is invalid, and
/// [`DployError::Plan`] when inspecting the trees fails.
pub fn plan_stow<P: AsRef<Path>>(
    sources: &[P],
    destination: &Path,
    ignore_patterns: &[String],
    log: &dyn Log,
) -> Result<Plan, DployError> {
    plan_trees(Operation::Stow, sources, destination, ignore_patterns, log)
}

/// Plan removing the links of every source tree from `destination`.
///
/// Conflicts are reported but never abort the plan. Directories emptied by
/// the removal are removed, and directories left holding links into a single
/// source directory are folded back into one link.
///
/// # Errors
///
/// Same as [`plan_stow`].
pub fn plan_unstow<P: AsRef<Path>>(
    sources: &[P],
    destination: &Path,
    ignore_patterns: &[String],
    log: &dyn Log,
) -> Result<Plan, DployError> {
    plan_trees(Operation::Unstow, sources, destination, ignore_patterns, log)
}

/// Plan a single link at `destination` pointing at `source`.
///
/// # Errors
///
/// Returns [`DployError::Validation`] when `source` does not exist or
/// `destination` has no file name, and [`DployError::Plan`] when inspecting
/// either path fails.
pub fn plan_link(source: &Path, destination: &Path, log: &dyn Log) -> Result<Plan, DployError> {
    let operation = Operation::Link;
    let invalid = |source| DployError::Validation { operation, source };

    let resolved = paths::resolve(source)
        .map_err(|e| invalid(unreadable(source, e)))?
        .ok_or_else(|| {
            invalid(ValidationError::MissingSource {
                path: source.to_path_buf(),
            })
        })?;
    let link = paths::absolute_location(destination)
        .map_err(|e| invalid(unreadable(destination, e)))?
        .ok_or_else(|| {
            invalid(ValidationError::InvalidDestination {
                path: destination.to_path_buf(),
            })
        })?;

    let mut planner = Planner::new(operation, log);
    planner
        .link_entry(&resolved, &link)
        .map_err(|source| DployError::Plan { operation, source })?;
    Ok(planner.finish())
}

fn plan_trees<P: AsRef<Path>>(
    operation: Operation,
    sources: &[P],
    destination: &Path,
    ignore_patterns: &[String],
    log: &dyn Log,
) -> Result<Plan, DployError> {
    let (roots, destination) = validate(sources, destination, ignore_patterns)
        .map_err(|source| DployError::Validation { operation, source })?;

    let mut planner = Planner::new(operation, log);
    for (root, rules) in &roots {
        if !rules.patterns().is_empty() {
            log.debug(&format!(
                "ignore rules for {}: {}",
                root.display(),
                rules.patterns().join(", ")
            ));
        }
        let tree = SourceTree {
            root,
            rules: Some(rules),
        };
        planner
            .walk(tree, root, &destination)
            .map_err(|source| DployError::Plan { operation, source })?;
    }
    Ok(planner.finish())
}

/// Resolve every root, rejecting anything that is not a directory, and
/// compile each source's ignore rules.
fn validate<P: AsRef<Path>>(
    sources: &[P],
    destination: &Path,
    ignore_patterns: &[String],
) -> Result<(Vec<(PathBuf, IgnoreRules)>, PathBuf), ValidationError> {
    let mut resolved_sources = Vec::with_capacity(sources.len());
    for source in sources {
        let source = source.as_ref();
        let resolved = paths::resolve_dir(source)
            .map_err(|e| unreadable(source, e))?
            .ok_or_else(|| ValidationError::SourceNotDirectory {
                path: source.to_path_buf(),
            })?;
        resolved_sources.push(resolved);
    }

    let dest = paths::resolve_dir(destination)
        .map_err(|e| unreadable(destination, e))?
        .ok_or_else(|| ValidationError::DestinationNotDirectory {
            path: destination.to_path_buf(),
        })?;

    let mut roots = Vec::with_capacity(resolved_sources.len());
    for source in resolved_sources {
        if source == dest {
            return Err(ValidationError::SameDirectory { path: source });
        }
        let rules = IgnoreRules::for_source(ignore_patterns, &source)?;
        roots.push((source, rules));
    }
    Ok((roots, dest))
}

fn unreadable(path: &Path, source: std::io::Error) -> ValidationError {
    ValidationError::Unreadable {
        path: path.to_path_buf(),
        source,
    }
}
