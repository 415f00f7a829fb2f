//! Console logger backed by `tracing`.
use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Log;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that forwards every message to `tracing`.
///
/// Stage headers and dry-run lines use dedicated targets so that the console
/// formatter installed by [`init_subscriber`](super::subscriber::init_subscriber)
/// can render them differently. Warnings are counted for the final summary.
#[derive(Debug, Default)]
pub struct Logger {
    warnings: AtomicUsize,
}

impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: AtomicUsize::new(0),
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dploy::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dploy::dry_run", "{msg}");
    }

    /// Number of warnings logged so far.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}
