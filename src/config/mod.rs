//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → store.rs (snapshot with derived category list)
//!
//! On replacement:
//!     admin endpoint persists a validated document
//!     watcher.rs detects the file change
//!     → loader.rs + validation.rs
//!     → store.rs swaps in a new snapshot
//!     → request paths observe it on their next load
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes replace the whole snapshot
//! - All fields have defaults, so the minimal document `{}` is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, save_config, ConfigError};
pub use schema::{CategoryConfig, GeneralSettings, ProxyConfig, SiteBinding};
pub use store::ConfigStore;
pub use watcher::ConfigWatcher;
