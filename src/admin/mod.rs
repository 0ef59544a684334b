//! Administrative HTTP surface.
//!
//! Runs on its own listener, away from proxy traffic. Serves the
//! configuration read/replace endpoints, the per-category report, and the
//! front-end build directory when one is present. CORS is wide open
//! because the front-end dev server runs on a different origin.

pub mod handlers;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use self::handlers::{info, read_config_file, write_config_file};
pub use self::handlers::AdminState;

use crate::http::server::shutdown_signal;

/// Build the admin router, mounting the front-end when `assets_dir`
/// exists.
pub fn setup_admin_router(state: AdminState, assets_dir: &Path) -> Router {
    let mut router = Router::new()
        .route("/read_config-file", get(read_config_file))
        .route("/write_config-file", post(write_config_file))
        .route("/info", get(info))
        .with_state(state);

    if assets_dir.is_dir() {
        let spa = ServeDir::new(assets_dir)
            .fallback(ServeFile::new(assets_dir.join("index.html")));
        router = router.fallback_service(spa);
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve the admin API on the given listener until shutdown.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(
        address = %addr,
        "Admin listener starting"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Admin listener stopped");
    Ok(())
}
