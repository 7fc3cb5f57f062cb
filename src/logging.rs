//! Logging setup
//!
//! The TUI owns the terminal, so interactive sessions log to a daily
//! rolling file. CLI commands log to stderr, quiet unless `--verbose`.
//! `RUST_LOG` overrides the default filter in both modes.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "movietui";
const DEFAULT_FILTER: &str = "movietui=debug,warn";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to `<dir>/movietui.YYYY-MM-DD`. Keep the returned guard alive until
/// exit so buffered lines are flushed.
pub fn init_file_logging(dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %dir.display(), "Logging initialized");
    Ok(guard)
}

/// Log to stderr; warnings only unless `verbose`
pub fn init_stderr_logging(verbose: bool) {
    let default = if verbose { DEFAULT_FILTER } else { "warn" };
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter(default))
        .with(fmt_layer)
        .try_init();
}
