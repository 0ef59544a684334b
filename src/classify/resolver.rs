//! Destination host classification.
//!
//! # Responsibilities
//! - Derive the runtime category list from a configuration
//! - Map a request's destination host to a category id
//!
//! # Design Decisions
//! - Matching is substring containment, not exact or suffix matching, so
//!   one binding like "google" covers every regional domain
//! - Categories are scanned in configured order and the last match wins
//! - Pure functions of their inputs; no I/O, no shared state

use crate::config::schema::ProxyConfig;

/// Sentinel id recorded for requests whose host matches no category.
pub const UNCATEGORIZED: u32 = 0;

/// A runtime category: one configured category joined with the hosts
/// bound to it.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: u32,
    pub title: String,
    pub hosts: Vec<String>,
}

impl Category {
    /// Build the ordered runtime category list from a configuration.
    ///
    /// Order follows the configured `categories` list; each category
    /// collects its bound hosts in binding order. Categories with no
    /// bindings are kept, with an empty host list.
    pub fn from_config(config: &ProxyConfig) -> Vec<Category> {
        config
            .categories
            .iter()
            .map(|category| Category {
                id: category.id,
                title: category.title.clone(),
                hosts: config
                    .sites
                    .iter()
                    .filter(|site| site.category_id == category.id)
                    .map(|site| site.host.clone())
                    .collect(),
            })
            .collect()
    }

    fn matches(&self, host: &str) -> bool {
        self.hosts.iter().any(|bound| host.contains(bound.as_str()))
    }
}

/// Resolve a destination host to a category id.
///
/// When several categories match, the one latest in the list wins out.
/// Returns [`UNCATEGORIZED`] when nothing matches.
pub fn resolve(host: &str, categories: &[Category]) -> u32 {
    let mut resolved = UNCATEGORIZED;
    for category in categories {
        if category.matches(host) {
            resolved = category.id;
        }
    }
    resolved
}
