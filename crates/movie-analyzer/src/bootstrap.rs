use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` takes the `DEBUG` / `INFO` / `WARNING` / `ERROR` names accepted
/// on the command line and is mapped to an [`EnvFilter`] directive. Falls back
/// to `"info"` if the level string is not recognised. Output goes to stderr so
/// that stdout carries only the report.
pub fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();
}

fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

// ── Path discovery ─────────────────────────────────────────────────────────────

/// Directory holding the running executable, or `.` when it cannot be found.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Locate the directory holding the CSV sources.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `<install_dir>/../data`
/// 2. `<install_dir>/data`
/// 3. `./data`
///
/// Falls back to `./data` when none exists, so the loader reports the missing
/// file by name.
pub fn discover_data_dir(install_dir: &Path) -> PathBuf {
    let candidates = [
        install_dir.join("..").join("data"),
        install_dir.join("data"),
        PathBuf::from("data"),
    ];
    candidates
        .into_iter()
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
