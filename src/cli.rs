//! Command-line interface for wesign
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Real-time Filipino Sign Language detection
#[derive(Parser, Debug)]
#[command(
    name = "wesign",
    version,
    about = "Real-time Filipino Sign Language detection"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Classification service URL override
    #[arg(long, global = true, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a detection session against the classification service
    Run {
        /// Stop automatically after this many seconds
        #[arg(long, value_name = "SECONDS")]
        duration: Option<u64>,
    },

    /// List the sign dictionary
    Signs,

    /// Look up signs for a typed utterance
    Lookup {
        /// Utterance to map to signs
        #[arg(required = true, value_name = "WORD")]
        words: Vec<String>,
    },

    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,
    /// Write a default configuration file
    Init,
}
