//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the link-farm manager.
#[derive(Parser, Debug)]
#[command(
    name = "dploy",
    about = "Manage symbolic link farms, like GNU stow",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "silent")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub silent: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Glob pattern of source entries to skip (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN", global = true)]
    pub ignore: Vec<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link the contents of source directories into a destination
    Stow(TreeOpts),
    /// Remove the links of previously stowed source directories
    Unstow(TreeOpts),
    /// Create a single link to a file or directory
    Link(LinkOpts),
    /// Print version information
    Version,
}

/// Options for the `stow` and `unstow` subcommands.
#[derive(Parser, Debug, Clone)]
pub struct TreeOpts {
    /// Source directories
    #[arg(required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Destination directory
    pub dest: PathBuf,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// File or directory to link to
    pub source: PathBuf,

    /// Location of the new link
    pub dest: PathBuf,
}
