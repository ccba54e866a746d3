use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,statline_terminal=debug";
const LOG_FILE: &str = "statline.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// File logging for the terminal UI, which owns stdout. Returns `None` (no
/// subscriber installed) when the directory cannot be written. Keep the guard
/// alive for the life of the process.
pub fn init_file_logging(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let dir = log_dir.map(PathBuf::from).or_else(default_log_dir)?;
    if !dir_is_writable(&dir) {
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(layer)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Compact stderr logging for one-shot tools.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn default_log_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_STATE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join("statline_terminal"));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("statline_terminal"),
    )
}

// `rolling::daily` panics if it cannot create its first file.
fn dir_is_writable(dir: &Path) -> bool {
    if fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_test");
    match fs::OpenOptions::new().create(true).append(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
