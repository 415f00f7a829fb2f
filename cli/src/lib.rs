//! Symbolic link farm manager.
//!
//! Projects the contents of one or more source directory trees into a
//! destination directory through symbolic links, and removes them again.
//! Directories owned by a single source are linked as a whole ("folded");
//! they are unfolded into real directories as soon as a second source needs
//! to contribute, and folded back when it is removed.
//!
//! The public API is organised into layers:
//!
//! - **[`paths`]** and **[`ignore`]**: path primitives and ignore rules
//! - **[`actions`]**: atomic, idempotent filesystem mutations
//! - **[`plan`]**: validation and the tree-merge planner
//! - **[`execute`]**: running a plan, optionally as a dry run
//! - **[`api`]**: `stow`, `unstow` and `link` as single calls
//! - **[`commands`]**: top-level subcommand orchestration for the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod api;
pub mod cli;
pub mod commands;
pub mod error;
pub mod execute;
pub mod ignore;
pub mod logging;
pub mod paths;
pub mod plan;
