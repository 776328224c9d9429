//! # Structured logging
//!
//! JSON lines go to stdout and to the configured log file. Each sink is fed by
//! its own `tracing-appender` worker thread, so concurrent requests never
//! interleave partial lines. The file is opened in append mode and never
//! rotated.
//!
//! `RUST_LOG` overrides the default `debug` filter.

use std::path::Path;

use anyhow::Context as _;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps both log writers alive; dropping it flushes pending lines.
#[must_use = "dropping the guards stops log delivery"]
pub struct LogGuards {
    _stdout: WorkerGuard,
    _file: WorkerGuard,
}

/// Install the global subscriber.
pub fn init(log_file: &Path) -> anyhow::Result<LogGuards> {
    let dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .with_context(|| format!("log file has no file name: {}", log_file.display()))?;

    // Fail early with a readable error instead of panicking inside the appender.
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("create log file {}", log_file.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_writer(stdout_writer),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(file_writer),
        )
        .try_init()
        .context("install tracing subscriber")?;

    tracing::info!(log_file = %log_file.display(), "Logger init success");

    Ok(LogGuards {
        _stdout: stdout_guard,
        _file: file_guard,
    })
}
