//! # Logging Utilities
//!
//! Logging infrastructure for Strata using `tracing`.
//!
//! The bridge normally runs inside a host debugger whose own output is what
//! the user is looking at, so there are two ways to set things up:
//!
//! - [`init_logging`] / [`init_logging_with_level`]: console (stderr) logging,
//!   optionally mirrored to a daily-rolling file. Used by the `strata` CLI.
//! - [`init_logging_for_host`]: file-only logging, nothing on the console.
//!   Used when embedded in a debugger.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=strata_core=trace`)
//! - `STRATA_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `STRATA_LOG_FILE`: Optional path to a log file mirrored alongside the console
//!
//! ## Example
//!
//! ```rust,no_run
//! use strata_utils::{init_logging_with_level, LogFormat, LogLevel};
//!
//! init_logging_with_level(LogLevel::Debug, LogFormat::Pretty).expect("Failed to initialize logging");
//! tracing::debug!("resolving callbacks");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "STRATA_LOG_FORMAT";
/// Environment variable naming a log file mirrored alongside the console.
pub const LOG_FILE_ENV: &str = "STRATA_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    Error,
    Warn,
    /// Info level (default)
    Info,
    Debug,
    /// Trace level: includes printer state transitions
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize console logging from the environment.
///
/// Reads `STRATA_LOG_FORMAT`, `RUST_LOG` and `STRATA_LOG_FILE`. Unparseable
/// values fall back to the defaults (pretty, info, no file).
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok())
        .map_or(Level::INFO, Into::into);

    init_console(format, default_level)
}

/// Initialize console logging with an explicit level and format.
///
/// `RUST_LOG`, when set, still takes precedence so that per-module filters
/// keep working.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_console(format, level.into())
}

/// Initialize file-only logging for use inside a host debugger.
///
/// Logs go to `~/.strata/YYYY-MM-DD-strata.log` (or `/tmp/` when `HOME` is
/// not set). Nothing is written to stdout or stderr. Returns the log path.
///
/// ## Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging_for_host(level: Option<LogLevel>) -> Result<PathBuf, LoggingError>
{
    let today = Utc::now().format("%Y-%m-%d");
    let directory = match env::var("HOME") {
        Ok(home) => {
            let directory = PathBuf::from(home).join(".strata");
            std::fs::create_dir_all(&directory)?;
            directory
        }
        Err(_) => PathBuf::from("/tmp"),
    };
    let log_file = directory.join(format!("{today}-strata.log"));

    // Explicit level wins, then RUST_LOG, then INFO.
    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => env::var("RUST_LOG")
            .ok()
            .and_then(|rust_log| EnvFilter::try_new(rust_log).ok())
            .unwrap_or_else(|| EnvFilter::new(Level::INFO.to_string())),
    };

    let (layer, guard) = file_layer(LogFormat::Pretty, &log_file, false, filter);
    install(vec![layer], Some(guard))?;
    Ok(log_file)
}

fn init_console(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let mut layers = vec![console_layer(format, filter())];
    let mut guard = None;
    if let Some(path) = env::var(LOG_FILE_ENV).ok().map(PathBuf::from) {
        let (layer, file_guard) = file_layer(format, &path, true, filter());
        layers.push(layer);
        guard = Some(file_guard);
    }
    install(layers, guard)
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(io::stderr);

    match format {
        LogFormat::Pretty => layer.with_ansi(true).with_filter(filter).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, path: &Path, rolling: bool, filter: EnvFilter) -> (BoxedLayer, WorkerGuard)
{
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default();
    let appender = if rolling {
        tracing_appender::rolling::daily(directory, file_name)
    } else {
        // The file name already carries the date.
        tracing_appender::rolling::never(directory, file_name)
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false);

    let layer = match format {
        LogFormat::Pretty => layer.with_filter(filter).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    };
    (layer, guard)
}

fn install(layers: Vec<BoxedLayer>, guard: Option<WorkerGuard>) -> Result<(), LoggingError>
{
    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    // The writer thread must outlive every log call; the subscriber is global.
    if let Some(guard) = guard {
        std::mem::forget(guard);
    }
    Ok(())
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
