//! Atomic filesystem actions emitted by the planner.
//!
//! Each action owns just the paths it needs to describe or perform itself
//! and performs exactly one filesystem mutation.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::paths;

/// A single planned mutation of the destination tree.
///
/// # Examples
///
/// ```
/// use dploy_cli::actions::Action;
/// use std::path::PathBuf;
///
/// let action = Action::MakeDirectory { path: PathBuf::from("/dest/aaa") };
/// assert_eq!(action.description(), "make directory /dest/aaa");
/// assert!(!action.is_noop());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a link at `link` pointing (relatively) at `target`.
    SymbolicLink {
        /// Absolute path the link points at.
        target: PathBuf,
        /// Absolute location of the link.
        link: PathBuf,
    },
    /// The link at `link` already points at `target`; reported only.
    SymbolicLinkExists {
        /// Absolute path the link points at.
        target: PathBuf,
        /// Absolute location of the link.
        link: PathBuf,
    },
    /// Remove the link at `link`, which currently points at `target`.
    Unlink {
        /// Absolute path the link points at.
        target: PathBuf,
        /// Absolute location of the link.
        link: PathBuf,
    },
    /// Create the directory `path`.
    MakeDirectory {
        /// Absolute path of the directory.
        path: PathBuf,
    },
    /// Remove the empty directory `path`.
    RemoveDirectory {
        /// Absolute path of the directory.
        path: PathBuf,
    },
}

/// Result of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The filesystem was modified.
    Applied,
    /// The filesystem already matched; nothing was done.
    AlreadyCorrect,
}

impl Action {
    /// One-line human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::SymbolicLink { target, link } => {
                format!("link {} => {}", link.display(), target.display())
            }
            Self::SymbolicLinkExists { target, link } => {
                format!("already linked {} => {}", link.display(), target.display())
            }
            Self::Unlink { target, link } => {
                format!("unlink {} => {}", link.display(), target.display())
            }
            Self::MakeDirectory { path } => format!("make directory {}", path.display()),
            Self::RemoveDirectory { path } => format!("remove directory {}", path.display()),
        }
    }

    /// Whether this action only reports and never touches the filesystem.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::SymbolicLinkExists { .. })
    }

    /// Perform the action.
    ///
    /// `SymbolicLink` and `MakeDirectory` succeed without changes when the
    /// filesystem already matches. `Unlink` refuses to remove anything that
    /// is not a symbolic link, and `RemoveDirectory` only removes empty
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error (permission denied, path vanished,
    /// directory not empty, ...).
    pub fn apply(&self) -> io::Result<Change> {
        match self {
            Self::SymbolicLink { target, link } => {
                let relative = paths::relative_target(target, link);
                if fs::read_link(link).is_ok_and(|existing| existing == relative) {
                    return Ok(Change::AlreadyCorrect);
                }
                create_symlink(&relative, link, target.is_dir())?;
                Ok(Change::Applied)
            }
            Self::SymbolicLinkExists { .. } => Ok(Change::AlreadyCorrect),
            Self::Unlink { link, .. } => {
                remove_symlink(link)?;
                Ok(Change::Applied)
            }
            Self::MakeDirectory { path } => {
                if fs::symlink_metadata(path).is_ok_and(|m| m.is_dir()) {
                    return Ok(Change::AlreadyCorrect);
                }
                fs::create_dir(path)?;
                Ok(Change::Applied)
            }
            Self::RemoveDirectory { path } => {
                fs::remove_dir(path)?;
                Ok(Change::Applied)
            }
        }
    }
}

/// Create a symlink at `link` storing `target` verbatim.
fn create_symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    #[cfg(unix)]
    {
        let _ = target_is_dir;
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target_is_dir {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`).
fn remove_symlink(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if !meta.is_symlink() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a symbolic link", path.display()),
        ));
    }
    if is_dir_like(&meta) {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
