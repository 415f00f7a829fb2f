//! Classification of a source entry against its destination path.
use std::path::{Path, PathBuf};

use super::ConflictKind;
use super::state::{Entry, PlannedState};
use crate::error::PlanError;
use crate::paths;

/// How a destination path relates to the source entry that maps onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Class {
    /// Nothing at the destination, and its parent directory exists.
    Absent,
    /// The destination is a link resolving to the source entry itself.
    SameFile,
    /// Both sides are directories. `collapsed` holds the resolved target
    /// when the destination is a link to another directory.
    Directories {
        /// Target of the collapsed destination link, if any.
        collapsed: Option<PathBuf>,
    },
    /// The destination cannot be merged with the source entry.
    Conflict(ConflictKind),
}

/// Classify `source` against `destination` in the planned state.
///
/// Only I/O failures other than "does not exist" are errors; every other
/// situation maps onto a [`Class`].
pub(super) fn classify(
    state: &PlannedState,
    source: &Path,
    destination: &Path,
) -> Result<Class, PlanError> {
    let source_resolved = paths::resolve(source).map_err(|e| PlanError::io(source, e))?;
    let source_is_dir = source_resolved.as_deref().is_some_and(Path::is_dir);

    let class = match state.lookup(destination)? {
        Entry::Absent => match destination.parent() {
            Some(parent) if state.lookup(parent)?.is_dir() => Class::Absent,
            _ => Class::Conflict(ConflictKind::MissingParent),
        },
        Entry::Link { resolved: None, .. } => Class::Conflict(ConflictKind::BrokenLink),
        Entry::Link {
            resolved: Some(resolved),
            ..
        } => {
            if source_resolved.as_ref() == Some(&resolved) {
                Class::SameFile
            } else if source_is_dir && resolved.is_dir() {
                Class::Directories {
                    collapsed: Some(resolved),
                }
            } else {
                Class::Conflict(ConflictKind::ExistingLink)
            }
        }
        Entry::Directory if source_is_dir => Class::Directories { collapsed: None },
        Entry::Directory => Class::Conflict(ConflictKind::ExistingDirectory),
        Entry::File => Class::Conflict(ConflictKind::ExistingFile),
    };
    Ok(class)
}
