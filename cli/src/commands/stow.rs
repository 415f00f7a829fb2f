//! Stow command implementation.
use anyhow::Result;

use crate::api::{self, Options};
use crate::cli::{GlobalOpts, TreeOpts};
use crate::logging::Logger;

/// Run the stow command.
///
/// # Errors
///
/// Returns an error if validation fails, any conflict is found, or an action
/// fails while linking.
pub fn run(global: &GlobalOpts, opts: &TreeOpts, log: &Logger) -> Result<()> {
    log.stage(&format!(
        "Stowing {} into {}",
        super::display_paths(&opts.sources),
        opts.dest.display()
    ));
    let options = Options::from(global);
    let outcome = api::stow(opts.sources.as_slice(), &opts.dest, &options, log)?;
    super::report(&outcome, log);
    Ok(())
}
