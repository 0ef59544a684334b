//! Access log data contract.

use serde::{Deserialize, Serialize};

/// One proxied request, as persisted in the access log.
///
/// Serialized as a single JSON object per line. The field names are the
/// on-disk contract; external consumers parse them, so renames here are
/// breaking changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogRecord {
    /// Destination authority of the request: host, plus port when the
    /// client sent one.
    pub host: String,

    /// Request path, without the query string.
    pub path: String,

    /// URI fragment. Kept for contract stability; always empty in
    /// practice, since clients do not transmit fragments and hyper drops
    /// them during URI parsing.
    pub fragment: String,

    /// Category the destination resolved to at write time. `0` records
    /// uncategorized traffic.
    pub category_id: u32,
}

/// Aggregated request count for one configured category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub title: String,
    pub count: u64,
}
