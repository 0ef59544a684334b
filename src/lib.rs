//! Transparent Forward HTTP Proxy Library

pub mod accesslog;
pub mod admin;
pub mod classify;
pub mod config;
pub mod http;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use config::store::ConfigStore;
pub use http::HttpServer;
