//! Access logging subsystem.
//!
//! # Responsibilities
//! - Persist one record per proxied request, append-only
//! - Aggregate the log into per-category counts on demand
//!
//! # Design Decisions
//! - The log file is the source of truth for reporting; it is appended
//!   to, never rewritten
//! - Writing is decoupled from the request path so disk latency never
//!   shows up in proxied response times
//! - Reading tolerates malformed lines instead of failing the report

pub mod aggregate;
pub mod record;
pub mod writer;

pub use aggregate::{aggregate, get_info};
pub use record::{AccessLogRecord, CategoryCount};
pub use writer::AccessLogWriter;
