//! CLI module for Heimdall.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Heimdall - watch what your LLM client says on the wire
///
/// Sends chat completions and dumps the HTTP exchange in a readable form, or
/// replays captured exchanges through the same formatter.
#[derive(Parser, Debug)]
#[command(name = "heimdall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Dump HTTP request/response pairs to stderr
    #[arg(long, global = true, env = "HEIMDALL_LOG_HTTP")]
    pub log_http: bool,

    /// Console log format (verbose, simple, json, http)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a single prompt to the chat completion API
    Ask {
        /// The prompt to send
        prompt: String,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Pretty-print a captured HTTP exchange saved as JSON
    Format {
        /// Capture file (use '-' for stdin)
        file: String,

        /// Never colour the output
        #[arg(long)]
        plain: bool,
    },

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

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
