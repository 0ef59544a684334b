//! Proxy listener and forwarding engine.
//!
//! # Responsibilities
//! - Accept absolute-URI (forward-proxy form) requests on a catch-all router
//! - Classify the destination and queue an access log record
//! - Sanitize hop-by-hop headers and fold the forwarding chain
//! - Dispatch to the destination and relay the response
//!
//! # Design Decisions
//! - One upstream attempt per request, with no retries and no deadline of
//!   our own; a slow destination is the client's to time out
//! - A fresh client per request keeps upstream connections non-persistent
//! - Bodies stream through in both directions, never buffered whole
//! - Classification and logging happen before the scheme gate, so rejected
//!   requests still show up in the report

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode, Version},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::accesslog::{AccessLogRecord, AccessLogWriter};
use crate::classify;
use crate::config::ConfigStore;
use crate::http::headers::{fold_forwarded_for, strip_hop_by_hop_headers};

/// Application state injected into the forwarding handler.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigStore,
    pub access_log: AccessLogWriter,
    pub connector: HttpsConnector<HttpConnector>,
}

/// Build the connector shared by the per-request upstream clients.
///
/// Speaks plain HTTP or TLS depending on the target scheme, trusting the
/// platform's native roots.
pub fn upstream_connector() -> HttpsConnector<HttpConnector> {
    hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .expect("Failed to load native root certificates")
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}

/// HTTP server for the forward proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create the proxy server with the given state.
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router: every path and method forwards. Targets
    /// with no path at all (authority form, as in CONNECT) match neither
    /// route, so the fallback sends them through the same handler.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .fallback(forward_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "Proxy listener starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Proxy listener stopped");
        Ok(())
    }
}

/// Main forwarding handler.
/// Classifies the destination, records it, and relays the request.
async fn forward_handler(
    State(state): State<AppState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
) -> Response {
    let host = request
        .uri()
        .authority()
        .map(|authority| authority.as_str().to_string())
        .unwrap_or_default();

    let snapshot = state.config.load();
    let category_id = classify::resolve(&host, &snapshot.categories);

    state.access_log.append(AccessLogRecord {
        host: host.clone(),
        path: request.uri().path().to_string(),
        // Fragments never survive URI parsing; the field stays for the
        // on-disk contract.
        fragment: String::new(),
        category_id,
    });

    tracing::debug!(
        method = %request.method(),
        host = %host,
        category_id,
        "Forwarding request"
    );

    // A request that reached us in origin or authority form, or over a
    // scheme we do not speak, is still logged above but goes no further.
    let scheme = request.uri().scheme_str().unwrap_or_default();
    if scheme != "http" && scheme != "https" {
        tracing::warn!(host = %host, scheme = %scheme, "Unsupported protocol scheme");
        return (
            StatusCode::BAD_REQUEST,
            format!("unsupported protocol scheme {scheme}"),
        )
            .into_response();
    }

    // The inbound request becomes an outbound client call: server-side
    // extensions and the inbound protocol version do not carry over.
    request.extensions_mut().clear();
    *request.version_mut() = Version::HTTP_11;

    strip_hop_by_hop_headers(request.headers_mut());
    fold_forwarded_for(request.headers_mut(), client_addr.ip());

    // Fresh client per request; nothing persists between requests.
    let client = Client::builder(TokioExecutor::new()).build(state.connector.clone());

    match client.request(request).await {
        Ok(response) => {
            let (mut parts, body) = response.into_parts();
            strip_hop_by_hop_headers(&mut parts.headers);
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(host = %host, error = %e, "Upstream request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
pub async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
