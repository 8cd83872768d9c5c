//! CLI argument definitions using clap
//!
//! ```text
//! folderdb [DATABASE_PATH] [--config FILE] [-q STATEMENT | -f FILE]
//!          [--log-level LEVEL] [--pretty]
//! ```

use clap::Parser;
use std::path::PathBuf;

/// folderdb - a file-per-document store with a small SQL-like query language
#[derive(Parser, Debug)]
#[command(name = "folderdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database root directory (overrides `data_dir` from the config file)
    pub database_path: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Execute one statement and exit
    #[arg(short = 'q', long, conflicts_with = "file")]
    pub query: Option<String>,

    /// Execute newline-delimited statements from a file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Minimum log severity written to stderr (TRACE, INFO, WARN, ERROR, FATAL)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Pretty-print result envelopes
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
