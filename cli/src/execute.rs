//! Run the actions of a [`Plan`] in order.
use crate::actions::Change;
use crate::error::ExecutionError;
use crate::logging::Log;
use crate::plan::Plan;

/// What executing a plan did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Actions that changed (or, in a dry run, would change) the filesystem.
    pub applied: usize,
    /// Actions whose effect was already in place.
    pub already_correct: usize,
    /// Whether the actions were only reported.
    pub dry_run: bool,
}

impl Summary {
    /// One-line human-readable summary.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.dry_run {
            format!(
                "{} would change, {} already ok",
                self.applied, self.already_correct
            )
        } else {
            format!("{} changed, {} already ok", self.applied, self.already_correct)
        }
    }
}

/// Execute `plan`, logging one line per action.
///
/// An aborted plan executes nothing. With `dry_run` every action is only
/// reported. Execution stops at the first failing action; actions that ran
/// before it are not rolled back.
///
/// # Errors
///
/// Returns the first action failure together with the action's description.
pub fn execute(plan: &Plan, dry_run: bool, log: &dyn Log) -> Result<Summary, ExecutionError> {
    let mut summary = Summary {
        dry_run,
        ..Summary::default()
    };
    if plan.aborted {
        return Ok(summary);
    }

    for action in &plan.actions {
        let description = action.description();
        if action.is_noop() {
            log.debug(&description);
            summary.already_correct += 1;
            continue;
        }
        if dry_run {
            log.dry_run(&description);
            summary.applied += 1;
            continue;
        }
        match action.apply() {
            Ok(Change::Applied) => {
                log.info(&description);
                summary.applied += 1;
            }
            Ok(Change::AlreadyCorrect) => {
                log.debug(&description);
                summary.already_correct += 1;
            }
            Err(source) => {
                log.error(&format!(
                    "{description}: {source} ({} earlier change(s) kept)",
                    summary.applied
                ));
                return Err(ExecutionError {
                    action: description,
                    source,
                });
            }
        }
    }
    Ok(summary)
}
