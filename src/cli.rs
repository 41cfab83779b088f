//! Command-line interface definition for LensCoach
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// LensCoach - AI photography coach
///
/// Ask for camera-setting advice about a scene or your photos and keep a
/// short, bounded history of coaching sessions on this machine.
#[derive(Parser, Debug, Clone)]
#[command(name = "lenscoach")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend base URL (e.g. http://192.168.1.20:8080/api)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Override the sessions database path
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Keep sessions in memory only for this run
    #[arg(long)]
    pub ephemeral: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ask the coach a question in the current session
    Ask {
        /// What you are shooting or what you want to know
        #[arg(default_value = "")]
        prompt: String,

        /// Attach a photo (repeatable, at most 3 are sent)
        #[arg(short, long = "image")]
        images: Vec<String>,
    },

    /// Start a new session and make it current
    New {
        /// Optional session title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Browse and manage session history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Show the prompt quota of the current session
    Quota,
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List sessions, most recently active first
    List,

    /// Print a session transcript (current session by default)
    Show {
        /// Session ID
        id: Option<String>,
    },

    /// Make another session current
    Switch {
        /// Session ID
        id: String,
    },

    /// Delete a session
    Delete {
        /// Session ID
        id: String,
    },

    /// Delete every session
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            backend_url: None,
            storage_path: None,
            ephemeral: false,
            command: Commands::Quota,
        }
    }
}
