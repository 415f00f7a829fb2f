//! Recursive lock-step walk of a source tree and the destination tree.
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::classify::{Class, classify};
use super::state::{Entry, PlannedState, read_names};
use super::{Conflict, ConflictKind, Plan};
use crate::actions::Action;
use crate::error::{Operation, PlanError};
use crate::ignore::IgnoreRules;
use crate::logging::Log;

/// The tree currently being walked on the source side.
#[derive(Debug, Clone, Copy)]
pub(super) struct SourceTree<'r> {
    /// Root the ignore rules are relative to.
    pub root: &'r Path,
    /// `None` while unfolding: every child of a collapsed link is re-linked.
    pub rules: Option<&'r IgnoreRules>,
}

/// Accumulates actions, conflicts and the planned destination state for one
/// invocation.
pub(super) struct Planner<'a> {
    operation: Operation,
    log: &'a dyn Log,
    state: PlannedState,
    actions: Vec<Action>,
    /// Links created by `actions`, so a later removal can retract them.
    planned_links: BTreeSet<PathBuf>,
    conflicts: Vec<Conflict>,
    aborted: bool,
}

impl<'a> Planner<'a> {
    pub(super) fn new(operation: Operation, log: &'a dyn Log) -> Self {
        Self {
            operation,
            log,
            state: PlannedState::default(),
            actions: Vec::new(),
            planned_links: BTreeSet::new(),
            conflicts: Vec::new(),
            aborted: false,
        }
    }

    pub(super) fn finish(self) -> Plan {
        Plan {
            operation: self.operation,
            actions: self.actions,
            conflicts: self.conflicts,
            aborted: self.aborted,
        }
    }

    /// Walk the children of `source_dir` against `dest_dir`.
    pub(super) fn walk(
        &mut self,
        tree: SourceTree<'_>,
        source_dir: &Path,
        dest_dir: &Path,
    ) -> Result<(), PlanError> {
        for name in read_names(source_dir)? {
            let source = source_dir.join(&name);
            let destination = dest_dir.join(&name);
            if let Some(rules) = tree.rules {
                let relative = source.strip_prefix(tree.root).unwrap_or(&source);
                if rules.is_ignored(relative) {
                    self.log.debug(&format!("ignoring {}", relative.display()));
                    continue;
                }
            }
            match self.operation {
                Operation::Unstow => self.unstow_entry(tree, &source, &destination)?,
                Operation::Stow | Operation::Link => {
                    self.stow_entry(tree, &source, &destination)?;
                }
            }
        }
        Ok(())
    }

    /// Plan a single link from `source` to `destination`, without recursion.
    pub(super) fn link_entry(&mut self, source: &Path, destination: &Path) -> Result<(), PlanError> {
        match classify(&self.state, source, destination)? {
            Class::Absent => self.push(symbolic_link(source, destination)),
            Class::SameFile => self.push(Action::SymbolicLinkExists {
                target: source.to_path_buf(),
                link: destination.to_path_buf(),
            }),
            Class::Directories { collapsed: None } => {
                self.conflict(ConflictKind::ExistingDirectory, source, destination);
            }
            Class::Directories { collapsed: Some(_) } => {
                self.conflict(ConflictKind::ExistingLink, source, destination);
            }
            Class::Conflict(kind) => self.conflict(kind, source, destination),
        }
        Ok(())
    }

    fn stow_entry(
        &mut self,
        tree: SourceTree<'_>,
        source: &Path,
        destination: &Path,
    ) -> Result<(), PlanError> {
        match classify(&self.state, source, destination)? {
            Class::Absent => self.push(symbolic_link(source, destination)),
            Class::SameFile => self.push(Action::SymbolicLinkExists {
                target: source.to_path_buf(),
                link: destination.to_path_buf(),
            }),
            Class::Directories {
                collapsed: Some(target),
            } => {
                self.unfold(&target, destination)?;
                self.walk(tree, source, destination)?;
            }
            Class::Directories { collapsed: None } => self.walk(tree, source, destination)?,
            Class::Conflict(kind) => self.conflict(kind, source, destination),
        }
        Ok(())
    }

    fn unstow_entry(
        &mut self,
        tree: SourceTree<'_>,
        source: &Path,
        destination: &Path,
    ) -> Result<(), PlanError> {
        match classify(&self.state, source, destination)? {
            Class::SameFile => self.unlink(source, destination),
            Class::Directories { collapsed: None } => {
                self.walk(tree, source, destination)?;
                let relative = source.strip_prefix(tree.root).unwrap_or(source);
                self.fold(destination, relative)?;
            }
            Class::Directories { collapsed: Some(_) } => {
                self.conflict(ConflictKind::ExistingLink, source, destination);
            }
            Class::Absent => {
                self.log.debug(&format!("not stowed {}", destination.display()));
            }
            Class::Conflict(kind) => self.conflict(kind, source, destination),
        }
        Ok(())
    }

    /// Replace the collapsed link at `destination` by a real directory holding
    /// one link per child of `target`.
    fn unfold(&mut self, target: &Path, destination: &Path) -> Result<(), PlanError> {
        self.log.debug(&format!(
            "unfolding {} => {}",
            destination.display(),
            target.display()
        ));
        self.unlink(target, destination);
        self.push(Action::MakeDirectory {
            path: destination.to_path_buf(),
        });
        let tree = SourceTree {
            root: target,
            rules: None,
        };
        self.walk(tree, target, destination)
    }

    /// Remove `dir` if unstowing emptied it, or collapse it back into a single
    /// link when everything left in it comes from one source directory.
    ///
    /// `relative` is the path of `dir` below the destination root; only a
    /// directory at that same path below some source is a fold origin.
    fn fold(&mut self, dir: &Path, relative: &Path) -> Result<(), PlanError> {
        if !self.state.was_touched(dir) {
            return Ok(());
        }
        let names = self.state.children(dir)?;
        if names.is_empty() {
            self.push(Action::RemoveDirectory {
                path: dir.to_path_buf(),
            });
            return Ok(());
        }
        let Some(origin) = self.fold_origin(dir, relative, &names)? else {
            return Ok(());
        };
        self.log.debug(&format!(
            "folding {} => {}",
            dir.display(),
            origin.display()
        ));
        for name in &names {
            self.unlink(&origin.join(name), &dir.join(name));
        }
        self.push(Action::RemoveDirectory {
            path: dir.to_path_buf(),
        });
        self.push(symbolic_link(&origin, dir));
        Ok(())
    }

    /// The single directory every remaining entry of `dir` links into, if
    /// it ends in `relative` and its children are exactly `names`.
    fn fold_origin(
        &self,
        dir: &Path,
        relative: &Path,
        names: &BTreeSet<OsString>,
    ) -> Result<Option<PathBuf>, PlanError> {
        let mut origin: Option<PathBuf> = None;
        for name in names {
            let Entry::Link {
                target,
                resolved: Some(_),
            } = self.state.lookup(&dir.join(name))?
            else {
                return Ok(None);
            };
            if target.file_name() != Some(name.as_os_str()) {
                return Ok(None);
            }
            let Some(parent) = target.parent() else {
                return Ok(None);
            };
            match &origin {
                Some(existing) if existing != parent => return Ok(None),
                Some(_) => {}
                None => origin = Some(parent.to_path_buf()),
            }
        }
        let Some(origin) = origin.filter(|origin| origin.ends_with(relative)) else {
            return Ok(None);
        };
        if read_names(&origin)? == *names {
            Ok(Some(origin))
        } else {
            Ok(None)
        }
    }

    fn conflict(&mut self, kind: ConflictKind, source: &Path, destination: &Path) {
        let conflict = Conflict {
            operation: self.operation,
            kind,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        };
        self.log.warn(&conflict.to_string());
        self.conflicts.push(conflict);
        if self.operation != Operation::Unstow {
            self.aborted = true;
        }
    }

    /// Remove the link at `link`. A link this plan created itself is taken
    /// back out of the plan instead, so no path is both linked and unlinked.
    fn unlink(&mut self, target: &Path, link: &Path) {
        let action = Action::Unlink {
            target: target.to_path_buf(),
            link: link.to_path_buf(),
        };
        if self.planned_links.remove(link) {
            let planned = self.actions.iter().rposition(
                |a| matches!(a, Action::SymbolicLink { link: existing, .. } if existing == link),
            );
            if let Some(index) = planned {
                self.actions.remove(index);
                self.state.apply(&action);
                return;
            }
        }
        self.push(action);
    }

    fn push(&mut self, action: Action) {
        self.state.apply(&action);
        if let Action::SymbolicLink { link, .. } = &action {
            self.planned_links.insert(link.clone());
        }
        self.actions.push(action);
    }
}

fn symbolic_link(target: &Path, link: &Path) -> Action {
    Action::SymbolicLink {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
    }
}
