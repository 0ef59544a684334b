//! Shared configuration state.
//!
//! # Design Decisions
//! - A published configuration is immutable; replacement swaps the whole
//!   snapshot atomically via `arc-swap`
//! - Each request loads exactly one snapshot and works against it, so an
//!   in-flight request may finish under a superseded configuration
//! - The runtime category list is derived once per replacement, not per
//!   request

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::classify::Category;
use crate::config::schema::ProxyConfig;

/// One immutable configuration generation, with its derived category list.
#[derive(Debug)]
pub struct Snapshot {
    pub config: ProxyConfig,
    pub categories: Vec<Category>,
}

impl Snapshot {
    fn build(config: ProxyConfig) -> Self {
        let categories = Category::from_config(&config);
        Self { config, categories }
    }
}

/// Handle to the active configuration, shared by every task.
///
/// Cloning is cheap; all clones observe the same snapshot sequence.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<ArcSwap<Snapshot>>,
}

impl ConfigStore {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(Snapshot::build(config))),
        }
    }

    /// Load the current snapshot.
    pub fn load(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    /// Publish a new configuration, replacing the current snapshot.
    pub fn replace(&self, config: ProxyConfig) {
        self.inner.store(Arc::new(Snapshot::build(config)));
    }
}
