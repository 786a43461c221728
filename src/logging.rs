//! Tracing setup. The terminal belongs to the TUI, so events go to a log file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::xdg_dir;

/// `$XDG_STATE_HOME/allegro/allegro.log`, or under `~/.local/state`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("allegro").join("allegro.log"))
}

/// Install the global subscriber. Returns the log file path on success.
///
/// Failure leaves the process without logging; it is never fatal.
pub fn init() -> Option<PathBuf> {
    let path = default_log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("ALLEGRO_LOG").unwrap_or_else(|_| "allegro=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok()?;

    Some(path)
}
