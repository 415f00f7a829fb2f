//! Link command implementation.
use anyhow::Result;

use crate::api::{self, Options};
use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::Logger;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if the source does not exist, the destination is
/// occupied, or creating the link fails.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Logger) -> Result<()> {
    log.stage(&format!(
        "Linking {} to {}",
        opts.dest.display(),
        opts.source.display()
    ));
    let options = Options::from(global);
    let outcome = api::link(&opts.source, &opts.dest, &options, log)?;
    super::report(&outcome, log);
    Ok(())
}
