//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Jump to previously visited directories by fuzzy path fragments.
#[derive(Debug, Parser)]
#[command(name = "dirhop", version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Explicit subcommand; bare fragments are treated as a search.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Implicit search arguments when no subcommand is given.
    #[command(flatten)]
    pub search: SearchArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve path fragments against the weight database.
    Search(SearchArgs),

    /// Add a directory to the database, or bump its weight.
    Add {
        /// Directory to record.
        path: PathBuf,
    },

    /// Remove a directory from the database.
    Remove {
        /// Directory to drop.
        path: PathBuf,
    },

    /// Clear the whole database.
    Clear,

    /// List database entries, heaviest first.
    List,
}

/// Arguments for a search.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Path fragments, matched in order with anything in between.
    pub fragments: Vec<String>,

    /// Report every match instead of only the best one.
    #[arg(long)]
    pub all: bool,

    /// Match case-insensitively.
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Keep only directories containing a file whose name matches this glob.
    #[arg(long, value_name = "GLOB")]
    pub filter: Option<String>,

    /// Print each match's weight after its path.
    #[arg(long)]
    pub list_weights: bool,
}
