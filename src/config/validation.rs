//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (site bindings reference existing categories)
//! - Detect ids that would corrupt reporting (duplicates, the reserved `0`)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: `ProxyConfig` → `Result<(), Vec<ValidationError>>`
//! - Runs before a configuration is accepted into the system, whether it
//!   arrives from disk or from the admin surface

use std::collections::HashSet;

use thiserror::Error;

use crate::classify::UNCATEGORIZED;
use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate category id {0}")]
    DuplicateCategoryId(u32),

    #[error("category id 0 is reserved for uncategorized traffic")]
    ReservedCategoryId,

    #[error("site binding {index} has an empty host substring")]
    EmptyHost { index: usize },

    #[error("site binding {index} references unknown category id {category_id}")]
    UnknownCategory { index: usize, category_id: u32 },
}

/// Validate a configuration document.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut known_ids = HashSet::new();
    for category in &config.categories {
        if category.id == UNCATEGORIZED {
            errors.push(ValidationError::ReservedCategoryId);
        } else if !known_ids.insert(category.id) {
            errors.push(ValidationError::DuplicateCategoryId(category.id));
        }
    }

    for (index, site) in config.sites.iter().enumerate() {
        if site.host.is_empty() {
            // An empty substring is contained in every host and would
            // silently swallow all traffic into one category.
            errors.push(ValidationError::EmptyHost { index });
        }
        if !known_ids.contains(&site.category_id) {
            errors.push(ValidationError::UnknownCategory {
                index,
                category_id: site.category_id,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
