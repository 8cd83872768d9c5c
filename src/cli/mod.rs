//! CLI module for folderdb
//!
//! Provides:
//! - single statement execution (`-q`)
//! - batch execution from a file (`-f`)
//! - line-by-line execution from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::Cli;
pub use commands::{open_database, run, run_cli, run_statements, Config, Settings};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{is_skippable, write_envelope};
