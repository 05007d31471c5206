//! Logging configuration for the Praxis SDK and explorer CLI.
//!
//! Logs to stderr and to a file. Call [init_logger] once at startup and keep
//! the returned guard alive so buffered file lines are flushed on exit.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "praxis-explorer.log";

const DEFAULT_FILTER: &str = "praxis_sdk=info,praxis_explorer=info";

/// Initializes logging to stderr and file.
///
/// Log file: `{dir}/praxis-explorer.log` (default: `$XDG_DATA_HOME/praxis-explorer`,
/// `~/.local/share/praxis-explorer`, or the current directory).
///
/// Default level is `info` for the SDK and CLI when `RUST_LOG` is not set.
/// Returns `None` (and logs to stderr only) when the directory cannot be created.
pub fn init_logger(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let dir = log_dir.unwrap_or_else(default_log_dir);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        tracing::warn!(dir = %dir.display(), error = %e, "failed to create log dir, file logging disabled");
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    tracing::debug!(file = %dir.join(LOG_FILE_NAME).display(), "file logging enabled");

    Some(guard)
}

fn default_log_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .map(|p| p.join("praxis-explorer"))
        .unwrap_or_else(|_| PathBuf::from("."))
}
