//! Logging infrastructure for console output.

mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::{Verbosity, init_subscriber};
pub use types::Log;
