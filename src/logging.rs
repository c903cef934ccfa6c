//! Log setup
//!
//! The TUI owns the terminal, so logs go to a file under the user cache
//! directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FIX_REVIEW_LOG";

const DEFAULT_FILTER: &str = "info";

/// Log file location
pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("fix-review").join("fix-review.log"))
}

/// Filter directive: environment first, then config, then the default
pub fn filter_directive(env: Option<&str>, configured: Option<&str>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or(configured)
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the file subscriber. Returns where logs go, or None when no
/// log file could be opened (logging is then off).
pub fn init(configured: Option<&str>) -> Option<PathBuf> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("  Warning: Failed to create log directory: {}", e);
            return None;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("  Warning: Failed to open log file {}: {}", path.display(), e);
            return None;
        }
    };

    let env = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env.as_deref(), configured);
    let env_filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Some(path)
}
