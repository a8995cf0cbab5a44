//! CLI module for vidbridge.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// vidbridge - video understanding tools for AI assistants
///
/// Runs an MCP server over stdio that exposes a hosted video API
/// (indexes, uploads, search, generation) as callable tools.
#[derive(Parser, Debug)]
#[command(name = "vidbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence diagnostic logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "VIDBRIDGE_CONFIG")]
    pub config: Option<String>,

    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server on stdin/stdout
    Serve,

    /// Print the tool registry as JSON
    Tools,

    /// Check credential, configuration and API reachability
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
