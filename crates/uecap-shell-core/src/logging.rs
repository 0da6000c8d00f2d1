//! Logging for the shell: a file under the XDG state dir, stderr otherwise.
//!
//! The filter comes from `UECAP_SHELL_LOG`, then `RUST_LOG`, then
//! [`DEFAULT_FILTER`]. Requests are served one per thread, so thread names
//! are part of every line.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when neither environment variable is set or parses.
pub const DEFAULT_FILTER: &str = "info,uecap_shell_core=debug,tiny_http=warn";

/// Environment variable checked before `RUST_LOG`.
pub const FILTER_ENV: &str = "UECAP_SHELL_LOG";

const APP_NAME: &str = "uecap-shell";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/uecap-shell/uecap-shell.log` (or the XDG equivalent).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
    Ok(xdg_dirs
        .get_state_home()
        .join(APP_NAME)
        .join(format!("{APP_NAME}.log")))
}

/// Sends all logging to [`log_file_path`].
/// Returns Err (state dir unwritable, subscriber already set) so the caller can fall back to stderr.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_thread_names(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging: {e}"))?;

    tracing::info!("{} {} logging to {}", APP_NAME, env!("CARGO_PKG_VERSION"), path.display());
    Ok(path)
}

/// Logging to stderr only, for when [`init_logging`] fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_thread_names(true)
        .with_ansi(false)
        .try_init();
}
