//! Destination classification subsystem.
//!
//! Maps the host a proxied request targets onto the configured category
//! taxonomy. Classification never affects forwarding; it only decides
//! what the access log records.

pub mod resolver;

pub use resolver::{resolve, Category, UNCATEGORIZED};
