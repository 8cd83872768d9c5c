//! CLI command implementations
//!
//! Startup sequence:
//! 1. Load and validate the config file (if any)
//! 2. Resolve settings; command-line flags win over the config file
//! 3. Open the database root (created if missing)
//! 4. Execute statements: one (`-q`), a file (`-f`), or stdin
//!
//! Only startup failures produce a non-zero exit; statement failures are
//! reported in their envelopes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, Database, OperationKind, ResultEnvelope, DEFAULT_HISTORY_LIMIT};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

use super::args::Cli;
use super::errors::{CliError, CliResult};
use super::io::{decode_lines, is_skippable, read_statements, write_envelope};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database root; the positional argument overrides it
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Entries kept in the session history (default 100)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Minimum log severity (default "WARN")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print envelopes (default false)
    #[serde(default)]
    pub pretty: bool,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_log_level() -> String {
    Severity::Warn.as_str().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_limit: default_history_limit(),
            log_level: default_log_level(),
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.history_limit == 0 {
            return Err(CliError::config_error("history_limit must be > 0"));
        }
        self.severity()?;
        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        parse_severity(&self.log_level)
    }
}

fn parse_severity(level: &str) -> CliResult<Severity> {
    level
        .parse::<Severity>()
        .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
}

/// Effective settings after merging flags and config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub history_limit: usize,
    pub log_level: Severity,
    pub pretty: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> CliResult<Self> {
        let config = match &cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let data_dir = cli
            .database_path
            .clone()
            .or_else(|| config.data_dir.as_ref().map(PathBuf::from))
            .ok_or_else(|| {
                CliError::config_error("No database path given (argument or config data_dir)")
            })?;

        let log_level = match &cli.log_level {
            Some(level) => parse_severity(level)?,
            None => config.severity()?,
        };

        Ok(Self {
            data_dir,
            history_limit: config.history_limit,
            log_level,
            pretty: cli.pretty || config.pretty,
        })
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate mode.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_cli(&cli).map_err(|e| {
        log_event_with_fields(
            Event::StartupFailed,
            &[("code", e.code_str()), ("message", e.message())],
        );
        e
    })
}

/// Runs a parsed command line, writing envelopes to stdout
pub fn run_cli(cli: &Cli) -> CliResult<()> {
    let settings = Settings::resolve(cli)?;
    Logger::set_min_severity(settings.log_level);

    let mut db = open_database(&settings)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(statement) = &cli.query {
        let envelope = db.execute(statement);
        return write_envelope(&mut out, &envelope, settings.pretty);
    }

    if let Some(path) = &cli.file {
        let script = fs::read(path).map_err(|e| {
            CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
        })?;
        run_statements(&mut db, decode_lines(script.as_slice()), &mut out, settings.pretty)?;
        return Ok(());
    }

    run_statements(&mut db, read_statements(), &mut out, settings.pretty)?;
    Ok(())
}

pub fn open_database(settings: &Settings) -> CliResult<Database> {
    Database::open_with_history_limit(&settings.data_dir, settings.history_limit).map_err(|e| {
        CliError::boot_failed(format!(
            "Cannot open database at {}: {}",
            settings.data_dir.display(),
            e.message()
        ))
    })
}

/// Executes statements until the input ends or `exit` succeeds.
/// Returns the number of statements executed.
///
/// A line that cannot be decoded gets a failure envelope and the batch
/// goes on; any other read error ends it.
pub fn run_statements<I, W>(db: &mut Database, lines: I, out: &mut W, pretty: bool) -> CliResult<usize>
where
    I: IntoIterator<Item = io::Result<String>>,
    W: Write,
{
    let mut executed = 0;
    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                let err = ApiError::invalid_encoding(&e);
                log_event_with_fields(Event::StatementFailed, &[("code", err.code())]);
                executed += 1;
                write_envelope(out, &ResultEnvelope::failure(OperationKind::Error, &err), pretty)?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if is_skippable(&line) {
            continue;
        }

        let envelope = db.execute(&line);
        executed += 1;
        write_envelope(out, &envelope, pretty)?;

        if envelope.is_exit() {
            break;
        }
    }
    Ok(executed)
}
