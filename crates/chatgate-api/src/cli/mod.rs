//! CLI command definitions for the `chatgate` binary.
//!
//! Uses clap derive macros for argument parsing. `serve` runs the gateway,
//! `chat` is a terminal client for a running gateway.

pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use chatgate_infra::config::DEFAULT_CONFIG_FILE;

/// Conversational gateway in front of a hosted chat-completion API.
#[derive(Parser)]
#[command(name = "chatgate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway.
    Serve {
        /// Bind address (overrides the config file).
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the TOML config file.
        #[arg(short, long, env = "CHATGATE_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Export spans with the OpenTelemetry stdout exporter.
        #[arg(long)]
        otel: bool,
    },

    /// Chat with a running gateway from the terminal.
    Chat {
        /// Gateway base URL.
        #[arg(long, env = "CHATGATE_URL", default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Session to continue (a fresh one is created when omitted).
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Path to the TOML config file.
        #[arg(short, long, env = "CHATGATE_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
