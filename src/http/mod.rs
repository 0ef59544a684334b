//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum catch-all, absolute-URI request form)
//!     → classify + access log (one record per request)
//!     → headers.rs (hop-by-hop strip, forwarding chain fold)
//!     → upstream dispatch (fresh client per request)
//!     → headers.rs again on the response
//!     → streamed back to the client
//! ```

pub mod headers;
pub mod server;

pub use headers::{HOP_BY_HOP_HEADERS, X_FORWARDED_FOR};
pub use server::{AppState, HttpServer};
