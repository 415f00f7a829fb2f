//! Domain-specific error types for dploy.
//!
//! Library code returns [`DployError`]; the `dploy` binary converts it to
//! [`anyhow::Error`] at the command boundary via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DployError
//! ├── Validation(ValidationError): bad roots or ignore patterns, nothing walked
//! ├── Conflicts                  : planning found conflicts, nothing executed
//! ├── Plan(PlanError)            : filesystem error while walking the trees
//! └── Execution(ExecutionError)  : an action failed, earlier actions stay applied
//! ```
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The subcommand an error or conflict belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Merge source trees into a destination.
    Stow,
    /// Remove the links of previously stowed sources.
    Unstow,
    /// Create a single link.
    Link,
}

impl Operation {
    /// Lower-case name as used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stow => "stow",
            Self::Unstow => "unstow",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Top-level error type, prefixed with the operation that failed.
#[derive(Error, Debug)]
pub enum DployError {
    /// Inputs were rejected before any tree was walked.
    #[error("dploy {operation}: {source}")]
    Validation {
        /// Operation that was requested.
        operation: Operation,
        /// What was wrong with the inputs.
        source: ValidationError,
    },

    /// Planning reported conflicts; the destination was left untouched.
    #[error("dploy {operation}: {count} conflict(s) found, nothing was changed")]
    Conflicts {
        /// Operation that was requested.
        operation: Operation,
        /// Number of conflicts reported while planning.
        count: usize,
    },

    /// A filesystem query failed while walking the trees.
    #[error("dploy {operation}: {source}")]
    Plan {
        /// Operation that was requested.
        operation: Operation,
        /// The failed query.
        source: PlanError,
    },

    /// An action failed while executing the plan.
    #[error("dploy {operation}: {source}")]
    Execution {
        /// Operation that was requested.
        operation: Operation,
        /// The failed action.
        source: ExecutionError,
    },
}

impl DployError {
    /// The underlying I/O error, if this error was caused by one.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Validation {
                source:
                    ValidationError::Unreadable { source, .. }
                    | ValidationError::IgnoreFile { source, .. },
                ..
            } => Some(source),
            Self::Plan {
                source: PlanError::Io { source, .. },
                ..
            } => Some(source),
            Self::Execution { source, .. } => Some(&source.source),
            _ => None,
        }
    }
}

/// Errors raised while validating roots and options.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A source root does not exist or is not a directory.
    #[error("cannot use '{}' as a source: no such directory", .path.display())]
    SourceNotDirectory {
        /// Path as given by the caller.
        path: PathBuf,
    },

    /// The destination root does not exist or is not a directory.
    #[error("cannot use '{}' as a destination: no such directory", .path.display())]
    DestinationNotDirectory {
        /// Path as given by the caller.
        path: PathBuf,
    },

    /// A source resolves to the destination directory.
    #[error("'{}' is used as both source and destination", .path.display())]
    SameDirectory {
        /// The resolved directory.
        path: PathBuf,
    },

    /// The source of a single link does not exist.
    #[error("cannot link '{}': no such file or directory", .path.display())]
    MissingSource {
        /// Path as given by the caller.
        path: PathBuf,
    },

    /// The destination of a single link has no file name (e.g. `..`).
    #[error("cannot link to '{}': not a valid link location", .path.display())]
    InvalidDestination {
        /// Path as given by the caller.
        path: PathBuf,
    },

    /// A root could not be resolved for a reason other than absence.
    #[error("cannot resolve '{}': {source}", .path.display())]
    Unreadable {
        /// Path as given by the caller.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An ignore pattern is not a valid glob.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser error.
        source: globset::Error,
    },

    /// A source's ignore file exists but could not be read.
    #[error("cannot read ignore file '{}': {source}", .path.display())]
    IgnoreFile {
        /// Path of the ignore file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors raised while walking the source and destination trees.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Listing, inspecting or resolving a path failed.
    #[error("cannot inspect '{}': {source}", .path.display())]
    Io {
        /// Path that was being inspected.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl PlanError {
    /// Wrap an I/O error raised while inspecting `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// An action of an executed plan failed.
///
/// Actions that ran before the failing one are not rolled back.
#[derive(Error, Debug)]
#[error("{action} failed: {source}")]
pub struct ExecutionError {
    /// Description of the failed action.
    pub action: String,
    /// Underlying I/O error.
    pub source: io::Error,
}
