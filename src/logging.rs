//! Logging configuration for Bat-Q.
//!
//! Logs go to stderr so they never mix with page output on stdout, or to a
//! file in the platform state directory when `logging.file` is set.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter from `RUST_LOG`, falling back to the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initializes logging according to the configuration.
pub fn init(config: &LoggingConfig) {
    if config.file {
        init_file_logging(&config.level);
    } else {
        init_stderr_logging(&config.level);
    }
}

/// Initializes file logging.
///
/// Location: `~/.local/state/batq/batq.log` on Linux (XDG state directory),
/// or the platform-appropriate state/config directory on other systems.
pub fn init_file_logging(default_level: &str) {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // Truncated on each run
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("batq").join("batq.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("batq").join("batq.log");
    }

    std::env::temp_dir().join("batq.log")
}
