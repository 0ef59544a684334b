//! Header sanitization for proxied requests and responses.
//!
//! # Design Decisions
//! - Exactly the RFC 2616 hop-by-hop set is stripped; nothing is inferred
//!   from the Connection header's listed tokens
//! - `HeaderMap` keys are lowercase by construction, so removal is
//!   case-insensitive for free
//! - The forwarding chain always folds to a single header line

use std::net::IpAddr;

use axum::http::{HeaderMap, HeaderValue};

/// Hop-by-hop headers, removed from forwarded requests and relayed
/// responses alike (RFC 2616 §13.5.1, including its "Trailers" spelling).
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Name of the forwarding-chain header.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Remove every hop-by-hop header.
pub fn strip_hop_by_hop_headers(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}

/// Fold the client address into the forwarding chain.
///
/// Prior `X-Forwarded-For` lines are joined with `", "` and the client IP
/// appended; with no prior lines the header becomes the client IP alone.
/// Whatever arrived, exactly one line leaves.
pub fn fold_forwarded_for(headers: &mut HeaderMap, client_ip: IpAddr) {
    // Join at the byte level: header values may carry opaque bytes that
    // are legal on the wire but not UTF-8, and those travel intact.
    let mut chain: Vec<u8> = Vec::new();
    for value in headers.get_all(X_FORWARDED_FOR) {
        chain.extend_from_slice(value.as_bytes());
        chain.extend_from_slice(b", ");
    }
    chain.extend_from_slice(client_ip.to_string().as_bytes());

    if let Ok(folded) = HeaderValue::from_bytes(&chain) {
        headers.insert(X_FORWARDED_FOR, folded);
    }
}
