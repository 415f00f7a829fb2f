//! Destination state as it will look once the actions planned so far run.
//!
//! The overlay records only what the plan changes; everything else is read
//! from disk on demand.
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use crate::actions::Action;
use crate::error::PlanError;
use crate::paths;

/// A planned destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// A link to the given absolute target.
    Link(PathBuf),
    /// A freshly created, initially empty directory.
    Directory,
    /// Nothing: the path is removed by the plan.
    Removed,
}

/// Where the current contents of a destination path come from.
#[derive(Debug)]
enum Location<'s> {
    Planned(&'s Node),
    Disk(PathBuf),
    Vacant,
}

/// What occupies a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Entry {
    /// Nothing.
    Absent,
    /// A symbolic link.
    Link {
        /// Absolute path stored in the link.
        target: PathBuf,
        /// Canonical path the link resolves to, `None` if it dangles.
        resolved: Option<PathBuf>,
    },
    /// A real directory.
    Directory,
    /// A file or any other non-directory object.
    File,
}

impl Entry {
    /// Whether entries can be created below this one.
    pub(super) fn is_dir(&self) -> bool {
        match self {
            Self::Directory => true,
            Self::Link { resolved, .. } => resolved.as_deref().is_some_and(Path::is_dir),
            Self::Absent | Self::File => false,
        }
    }
}

/// Overlay of planned changes on top of the real destination tree.
#[derive(Debug, Default)]
pub(super) struct PlannedState {
    nodes: BTreeMap<PathBuf, Node>,
    touched: BTreeSet<PathBuf>,
}

impl PlannedState {
    /// Record the effect of `action`.
    pub(super) fn apply(&mut self, action: &Action) {
        match action {
            Action::SymbolicLink { target, link } => self.set(link, Node::Link(target.clone())),
            Action::SymbolicLinkExists { .. } => {}
            Action::MakeDirectory { path } => self.set(path, Node::Directory),
            Action::Unlink { link: path, .. } | Action::RemoveDirectory { path } => {
                self.set(path, Node::Removed);
                if let Some(parent) = path.parent() {
                    self.touched.insert(parent.to_path_buf());
                }
            }
        }
    }

    /// Whether the plan removes anything directly inside `dir`.
    pub(super) fn was_touched(&self, dir: &Path) -> bool {
        self.touched.contains(dir)
    }

    /// What will occupy `path`.
    pub(super) fn lookup(&self, path: &Path) -> Result<Entry, PlanError> {
        match self.locate(path) {
            Location::Planned(Node::Link(target)) => Ok(Entry::Link {
                resolved: paths::resolve(target).map_err(|e| PlanError::io(path, e))?,
                target: target.clone(),
            }),
            Location::Planned(Node::Directory) => Ok(Entry::Directory),
            Location::Planned(Node::Removed) | Location::Vacant => Ok(Entry::Absent),
            Location::Disk(real) => inspect(&real),
        }
    }

    /// Names that will exist inside the directory `dir`.
    pub(super) fn children(&self, dir: &Path) -> Result<BTreeSet<OsString>, PlanError> {
        let mut names = match self.locate(dir) {
            Location::Disk(real) => read_names(&real)?,
            Location::Planned(Node::Link(target)) => read_names(target)?,
            Location::Planned(_) | Location::Vacant => BTreeSet::new(),
        };
        for (path, node) in self.below(dir) {
            if path.parent() != Some(dir) {
                continue;
            }
            let Some(name) = path.file_name() else {
                continue;
            };
            if *node == Node::Removed {
                names.remove(name);
            } else {
                names.insert(name.to_os_string());
            }
        }
        Ok(names)
    }

    /// Replace whatever is planned at or below `path` with `node`.
    fn set(&mut self, path: &Path, node: Node) {
        let stale: Vec<PathBuf> = self
            .below(path)
            .map(|(planned, _)| planned.clone())
            .collect();
        for planned in stale {
            self.nodes.remove(&planned);
        }
        self.nodes.insert(path.to_path_buf(), node);
    }

    /// Planned nodes strictly below `dir`. Paths order component-wise, so
    /// they form one contiguous run right after `dir` itself.
    fn below<'s>(&'s self, dir: &'s Path) -> impl Iterator<Item = (&'s PathBuf, &'s Node)> {
        self.nodes
            .range::<Path, _>((Bound::Excluded(dir), Bound::Unbounded))
            .take_while(move |(planned, _)| planned.starts_with(dir))
    }

    fn locate(&self, path: &Path) -> Location<'_> {
        if let Some(node) = self.nodes.get(path) {
            return Location::Planned(node);
        }
        for ancestor in path.ancestors().skip(1) {
            match self.nodes.get(ancestor) {
                // Below a planned link: the contents are those of its target.
                Some(Node::Link(target)) => {
                    let real = path
                        .strip_prefix(ancestor)
                        .map_or_else(|_| path.to_path_buf(), |rest| target.join(rest));
                    return Location::Disk(real);
                }
                Some(Node::Directory | Node::Removed) => return Location::Vacant,
                None => {}
            }
        }
        Location::Disk(path.to_path_buf())
    }
}

/// Inspect `path` on disk without following a final symbolic link.
fn inspect(path: &Path) -> Result<Entry, PlanError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Ok(Entry::Absent);
        }
        Err(e) => return Err(PlanError::io(path, e)),
    };
    if meta.is_symlink() {
        let target = paths::read_link_absolute(path).map_err(|e| PlanError::io(path, e))?;
        let resolved = paths::resolve(path).map_err(|e| PlanError::io(path, e))?;
        Ok(Entry::Link { target, resolved })
    } else if meta.is_dir() {
        Ok(Entry::Directory)
    } else {
        Ok(Entry::File)
    }
}

/// Sorted names of the entries of the directory `dir`.
pub(super) fn read_names(dir: &Path) -> Result<BTreeSet<OsString>, PlanError> {
    fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.file_name()))
                .collect::<io::Result<BTreeSet<_>>>()
        })
        .map_err(|e| PlanError::io(dir, e))
}
