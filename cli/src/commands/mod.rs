//! Top-level subcommand orchestration.
pub mod link;
pub mod stow;
pub mod unstow;
pub mod version;

use std::path::Path;

use crate::api::{Options, Outcome};
use crate::cli::GlobalOpts;
use crate::logging::Logger;

impl From<&GlobalOpts> for Options {
    fn from(global: &GlobalOpts) -> Self {
        Self {
            dry_run: global.dry_run,
            ignore_patterns: global.ignore.clone(),
        }
    }
}

/// Comma-separated display form of a list of paths.
fn display_paths<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the closing summary of a command.
fn report(outcome: &Outcome, log: &Logger) {
    for line in summary_lines(outcome, log.warning_count()) {
        log.info(&line);
    }
}

fn summary_lines(outcome: &Outcome, warnings: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if warnings > 0 {
        lines.push(format!(
            "{warnings} warning(s), {} conflict(s) left in place",
            outcome.conflicts.len()
        ));
    }
    lines.push(outcome.summary.describe());
    lines
}
