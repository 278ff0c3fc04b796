//! Configuration file watcher for hot reload of route limits.
//!
//! A running server only applies route ceilings, so the watcher forwards a
//! [`RouteLimitTable`] and stays quiet when an edit leaves the table as it
//! was. The parent directory is watched so editors that save by rename are
//! still seen.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RateLimitConfig;
use crate::security::RouteLimitTable;

/// Watches the configuration file and emits reloaded route limit tables.
pub struct ConfigWatcher {
    path: PathBuf,
    current: RateLimitConfig,
    update_tx: mpsc::UnboundedSender<RouteLimitTable>,
}

impl ConfigWatcher {
    /// `current` is the rate limit section the server is running with.
    ///
    /// Returns the watcher and a receiver for route limit updates.
    pub fn new(
        path: &Path,
        current: RateLimitConfig,
    ) -> (Self, mpsc::UnboundedReceiver<RouteLimitTable>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for updates to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current,
            update_tx,
        } = self;
        let dir = watch_dir(&path);
        let file_name: Option<OsString> = path.file_name().map(|n| n.to_os_string());
        let config_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                if !event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == file_name.as_deref())
                {
                    return;
                }
                // Truncated mid-write; the write that follows fires again.
                if std::fs::metadata(&config_path).map_or(true, |m| m.len() == 0) {
                    return;
                }

                match load_config(&config_path) {
                    Ok(reloaded) => {
                        if let Some(table) = route_update(&mut current, reloaded.rate_limit) {
                            tracing::info!(
                                path = ?config_path,
                                routes = table.len(),
                                default_limit = table.default_limit(),
                                "Route limits changed on disk"
                            );
                            let _ = update_tx.send(table);
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to reload config, keeping current route limits");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Table to send for a reloaded rate limit section, or `None` when the
/// running ceilings would not change. `current` tracks the last section seen.
fn route_update(
    current: &mut RateLimitConfig,
    reloaded: RateLimitConfig,
) -> Option<RouteLimitTable> {
    if *current == reloaded {
        return None;
    }

    if current.enabled != reloaded.enabled
        || current.window_secs != reloaded.window_secs
        || current.api_prefix != reloaded.api_prefix
    {
        tracing::warn!("Rate limit settings besides route ceilings take effect on restart");
    }

    let ceilings_changed =
        current.routes != reloaded.routes || current.default_limit != reloaded.default_limit;
    *current = reloaded;
    ceilings_changed.then(|| RouteLimitTable::from_config(current))
}
