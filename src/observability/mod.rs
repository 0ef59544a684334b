//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → stdout, filtered by RUST_LOG
//!     → tower-http trace layers on both listeners
//! ```
//!
//! # Design Decisions
//! - Structured fields over interpolated strings for machine parsing
//! - The access log is not observability; it is product data and lives
//!   in the accesslog subsystem

pub mod logging;
