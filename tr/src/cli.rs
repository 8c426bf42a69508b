//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::render::OutputFormat;

/// TravelRAD - AI travel itinerary planner
#[derive(Parser)]
#[command(
    name = "tr",
    about = "Plan a trip from your preferences with a generative AI model",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/travelrad/logs/travelrad.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Launch the interactive planner (default)
    Tui,

    /// Plan a trip from a preferences file without the TUI
    Plan {
        /// Preferences file (YAML or JSON)
        #[arg(value_name = "PREFS_FILE")]
        prefs_file: PathBuf,

        /// Agree to the processing terms
        #[arg(long)]
        agree_terms: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the rendered system instruction and prompt
    Prompt {
        /// Preferences file (YAML or JSON)
        #[arg(value_name = "PREFS_FILE")]
        prefs_file: PathBuf,
    },

    /// Print the response schema sent to the model
    Schema,

    /// Show city suggestions for a prefix
    Cities {
        /// Start of a city name
        prefix: String,
    },
}

/// Path of the log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelrad")
        .join("logs")
        .join("travelrad.log")
}
