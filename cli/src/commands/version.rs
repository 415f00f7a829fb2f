//! Command: print version information.

/// The dploy version: the build-time `DPLOY_VERSION` if set, otherwise the
/// crate version.
#[must_use]
pub fn current() -> &'static str {
    option_env!("DPLOY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the dploy version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dploy {}", current());
}
