//! Unstow command implementation.
use anyhow::Result;

use crate::api::{self, Options};
use crate::cli::{GlobalOpts, TreeOpts};
use crate::logging::Logger;

/// Run the unstow command.
///
/// Conflicts are reported as warnings and do not fail the command.
///
/// # Errors
///
/// Returns an error if validation fails, the trees cannot be inspected, or an
/// action fails while unlinking.
pub fn run(global: &GlobalOpts, opts: &TreeOpts, log: &Logger) -> Result<()> {
    log.stage(&format!(
        "Unstowing {} from {}",
        super::display_paths(&opts.sources),
        opts.dest.display()
    ));
    let options = Options::from(global);
    let outcome = api::unstow(opts.sources.as_slice(), &opts.dest, &options, log)?;
    super::report(&outcome, log);
    Ok(())
}
