// src/logging.rs
//! Logging setup shared by the library and the CLI

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log through `tracing` at the given level: `app_log!(info, "Loaded {}", x)`.
#[macro_export]
macro_rules! app_log {
    (trace, $($arg:tt)+) => { ::tracing::trace!($($arg)+) };
    (debug, $($arg:tt)+) => { ::tracing::debug!($($arg)+) };
    (info, $($arg:tt)+) => { ::tracing::info!($($arg)+) };
    (warn, $($arg:tt)+) => { ::tracing::warn!($($arg)+) };
    (error, $($arg:tt)+) => { ::tracing::error!($($arg)+) };
}

pub const LOG_FILE_ENV: &str = "JOB_PORTAL_LOG_FILE";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global subscriber.
///
/// JSON lines go to `JOB_PORTAL_LOG_FILE` when it is set, otherwise
/// human readable output goes to stderr so stdout stays clean for command output.
pub fn init_tracing() -> Result<()> {
    match std::env::var(LOG_FILE_ENV) {
        Ok(path) if !path.is_empty() => init_json_file(Path::new(&path)),
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(env_filter())
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
            Ok(())
        }
    }
}

fn init_json_file(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(env_filter())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
