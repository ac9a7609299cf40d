//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// ContentForge - topic to ideas, outline, drafts and social posts
#[derive(Parser)]
#[command(
    name = "cf",
    about = "Turn a topic into ideas, an outline, drafted sections and social posts",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to the interactive REPL)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate content ideas for a topic
    Ideas {
        topic: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Build an outline for one content idea
    Outline {
        idea: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Draft every section of an outline (read from a file or stdin)
    Draft {
        /// Topic the sections are written about
        #[arg(short, long)]
        topic: String,

        /// Outline file; stdin when omitted
        #[arg(short, long, value_name = "FILE")]
        outline_file: Option<PathBuf>,

        /// Run the per-section refinement pass
        #[arg(long)]
        refine: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate social posts from drafted content (read from a file or stdin)
    Social {
        /// Content file; stdin when omitted
        #[arg(long, value_name = "FILE")]
        content_file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the whole pipeline for a topic
    Run {
        topic: String,

        /// Which idea to develop (1-based)
        #[arg(short, long, default_value = "1")]
        pick: usize,

        /// Run the per-section refinement pass
        #[arg(long)]
        refine: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Start an interactive session
    Repl,

    /// Show logs
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },
}

/// Get the path to the log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contentforge")
        .join("logs")
        .join("contentforge.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
