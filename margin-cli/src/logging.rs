//! File logging. The terminal is owned by the UI, so everything goes to
//! `~/.margin/logs/margin.log`.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "margin.log";
const DEFAULT_FILTER: &str = "info,margin_core=debug,margin_cli=debug";

/// Install the global subscriber. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init(dir: &Path, configured: Option<&str>) -> Result<WorkerGuard> {
    let logs_dir = dir.join("logs");
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create {}", logs_dir.display()))?;

    if let Ok(mut file) = OpenOptions::new().append(true).open(logs_dir.join(LOG_FILE)) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(file, "\n{separator}\n=== Session started at {timestamp} ===\n{separator}");
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter(configured))
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

/// `RUST_LOG` wins, then the configured directive, then the built-in default
fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
