//! Logging initialization.
//!
//! Logs go to a file so they never interleave with the interactive prompt.
//! Each run gets its own file under `~/.rusty-history/logs/`, e.g.
//! `rusty-history.2026-10-19-14-30-25.log`.
//!
//! The level is taken from `RUST_LOG` (`debug`, `info`, `warn`, `error`) and
//! defaults to `info`.

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber writing into a fresh log file in `log_dir`.
///
/// Returns the writer guard, which must be held until exit so buffered lines
/// are flushed. Returns `None` (after a warning on stderr) when the log file
/// cannot be created; the program keeps running without logs.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
        return None;
    }

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_path = log_dir.join(format!("rusty-history.{}.log", timestamp));

    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {}", e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Some(guard)
}
