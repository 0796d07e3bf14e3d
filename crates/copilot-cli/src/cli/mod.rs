//! CLI command definitions for the `pulumi-copilot` binary.
//!
//! Uses clap derive macros for argument parsing. `chat` opens the
//! interactive session; everything else is a one-shot command.

pub mod activity;
pub mod ask;
pub mod auth;
pub mod chat;
pub mod prompts;
pub mod stream;
pub mod turn;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with Pulumi Copilot from your terminal.
#[derive(Parser)]
#[command(name = "pulumi-copilot", version, about, long_about = None)]
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

    /// Pulumi Cloud REST API base URL (overrides config and environment).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Organization to use for the session.
        #[arg(long, value_name = "HANDLE")]
        org: Option<String>,
    },

    /// Send a single prompt and print the answer.
    Ask {
        /// The prompt text.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Organization to use for the question.
        #[arg(long, value_name = "HANDLE")]
        org: Option<String>,
    },

    /// Save a Pulumi access token to the OS keychain.
    Login {
        /// Token to store. Prompted for when omitted.
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove the stored access token.
    Logout,

    /// Show the signed-in user and their organizations.
    Whoami,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
