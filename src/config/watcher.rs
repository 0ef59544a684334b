//! Configuration file watcher for hot reload.
//!
//! # Responsibilities
//! - Watch the configuration file for edits (including the ones the admin
//!   surface itself persists)
//! - Reload, validate and publish changed documents
//!
//! # Design Decisions
//! - A document that fails to load or validate is dropped with an error
//!   log; the active configuration stays in force
//! - The notify callback runs on the watcher's own thread, so updates
//!   cross into the runtime over an unbounded channel

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProxyConfig;

/// Watches the configuration file and emits validated replacements.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ProxyConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`.
    ///
    /// Returns the watcher and the receiver the runtime drains for
    /// configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ProxyConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned guard owns the watch; dropping it stops hot reload.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        reload_and_publish(&path, &tx);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Configuration watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Configuration watcher started");
        Ok(watcher)
    }
}

fn reload_and_publish(path: &Path, tx: &mpsc::UnboundedSender<ProxyConfig>) {
    tracing::info!("Configuration file changed, reloading");
    match load_config(path) {
        Ok(config) => {
            // Receiver gone means the runtime is shutting down.
            let _ = tx.send(config);
        }
        Err(e) => {
            tracing::error!(error = %e, "Reload rejected, keeping active configuration");
        }
    }
}
