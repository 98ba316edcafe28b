//! CLI command definitions and dispatch for the `mnema` binary.
//!
//! Uses clap derive macros for argument parsing. `mnema` with no
//! subcommand starts the interactive chat session.

pub mod chat;
pub mod nodes;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with your personal knowledge graph.
#[derive(Parser)]
#[command(name = "mnema", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the agent server base URL.
    #[arg(long, global = true, env = "MNEMA_SERVER")]
    pub server: Option<String>,

    /// Export OpenTelemetry spans to stdout.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (the default).
    Chat,

    /// List knowledge-graph entities, newest first.
    #[command(alias = "ls")]
    Nodes {
        /// Maximum number of rows to display.
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
