//! The [`Log`] trait shared by the planner, the executor and the CLI.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; tests use a
/// recording implementation so they can assert on what was reported without
/// installing a subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message (conflicts are reported here).
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log an action that would have been performed outside dry-run mode.
    fn dry_run(&self, msg: &str);
}
