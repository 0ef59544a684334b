//! Configuration schema definitions.
//!
//! The configuration is a single JSON document: general settings, an
//! ordered list of category definitions, and an ordered list of
//! site-to-category bindings. All types derive Serde traits so the same
//! structs back the file on disk and the admin replacement endpoint.

use serde::{Deserialize, Serialize};

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// General settings (access log location).
    pub settings: GeneralSettings,

    /// Category definitions. Order matters: it is the scan order when a
    /// destination matches more than one category.
    pub categories: Vec<CategoryConfig>,

    /// Site-to-category bindings.
    pub sites: Vec<SiteBinding>,
}

/// General proxy settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Path of the append-only access log file.
    pub access_log: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            access_log: "access.log".to_string(),
        }
    }
}

/// One traffic category. Proxied requests are classified into these for
/// reporting.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CategoryConfig {
    /// Unique category identifier. Id `0` is reserved for uncategorized
    /// traffic and rejected by validation.
    pub id: u32,

    /// Human-readable title, display-only.
    pub title: String,
}

/// Binds a destination host substring to a category.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteBinding {
    /// Category the host belongs to.
    pub category_id: u32,

    /// Substring matched against the request's destination host.
    pub host: String,
}
