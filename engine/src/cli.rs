//! CLI interface for Tiller
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines the commands for running directives, serving the HTTP API,
//! and inspecting configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tiller directive-reasoning engine
///
/// A deterministic, single-shot reasoning engine: give it a directive and a
/// memory file, get back an ordered plan, an analysis, scored candidate
/// actions, reflections, and the updated memory set.
#[derive(Parser, Debug)]
#[command(name = "tiller")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process a directive immediately
    Run {
        /// The directive to process
        directive: String,

        /// Memory file to load and update (seeded on first use)
        #[arg(long, value_name = "PATH")]
        memory: Option<PathBuf>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port override for 127.0.0.1 (0 picks a free port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}
