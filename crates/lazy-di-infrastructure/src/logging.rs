//! Structured logging with tracing
//!
//! The core crate only emits events (registrations, overrides, construction
//! start and failure); installing a subscriber is left to this module so
//! that host programs embedding the registry keep control of their own.
//!
//! Events always go to stderr. The `lazy-di` tool prints listings, rendered
//! docs and resolved values on stdout, and that output must stay pipeable
//! whatever the log level.

use std::path::Path;

use lazy_di_core::{Error, Result};
use tracing::{Level, info, warn};
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::config::LoggingConfig;
use crate::constants::{LOG_FILE_STEM, LOG_FILTER_ENV};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the process-wide subscriber described by `config`
///
/// A `LAZY_DI_LOG` directive (e.g. `lazy_di_core=trace`) replaces the
/// configured level entirely, which is how construction traces are turned
/// on for a single run. The configured level is still validated first, so a
/// bad config file is reported even when the variable is set.
///
/// Only one subscriber can exist per process: a second call, or a call from
/// a host that already installed its own, is a `Configuration` error rather
/// than a panic.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers = vec![stderr_layer(config.json_format)];
    if let Some(path) = &config.file_output {
        layers.push(file_layer(config.json_format, daily_appender(path)));
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| Error::config_with_source("Failed to install log subscriber", e))?;

    info!(%level, json = config.json_format, "Logging initialized");
    Ok(())
}

fn stderr_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer(json: bool, appender: RollingFileAppender) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Daily-rotated file next to `path`, named after its stem
///
/// A path with no file name (such as `/`) falls back to `lazy-di.<date>`.
fn daily_appender(path: &Path) -> RollingFileAppender {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = path
        .file_stem()
        .unwrap_or_else(|| std::ffi::OsStr::new(LOG_FILE_STEM));
    rolling::daily(dir, stem)
}

/// Parse a configured level name; `warning` is accepted for `warn`
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Report whether the tool found its configuration file
///
/// A missing file is not an error (defaults and env still apply) but is
/// worth a warning since it usually means a wrong `--config`.
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}
