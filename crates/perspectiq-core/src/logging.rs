//! Log file setup.
//!
//! The TUI owns the terminal, so logs always go to
//! `${PERSPECTIQ_HOME}/logs/perspectiq.log`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, paths};

pub const LOG_FILE_NAME: &str = "perspectiq.log";

/// Builds the filter: `PERSPECTIQ_LOG`, then the configured level, then `info`.
pub fn build_filter(config_level: &str) -> EnvFilter {
    if let Ok(directives) = std::env::var("PERSPECTIQ_LOG")
        && let Ok(filter) = EnvFilter::try_new(directives.trim())
    {
        return filter;
    }
    EnvFilter::try_new(config_level.trim())
        .unwrap_or_else(|_| EnvFilter::new(Config::DEFAULT_LOG_LEVEL))
}

/// Installs the global subscriber writing to the default logs directory.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the writer.
///
/// # Errors
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), &config.log_level)
}

/// Installs the global subscriber writing to `dir/perspectiq.log`.
///
/// # Errors
/// Returns an error if `dir` cannot be created or a global subscriber is
/// already installed.
pub fn init_in(dir: &Path, level: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(guard)
}
