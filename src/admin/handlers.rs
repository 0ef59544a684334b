//! Administrative API handlers.
//!
//! Route paths and response shapes are the contract the bundled
//! front-end is built against; keep them stable.

use std::path::PathBuf;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::accesslog::get_info;
use crate::config::{save_config, validation::validate_config, ConfigStore, ProxyConfig};

/// State shared by the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub config: ConfigStore,
    pub config_path: PathBuf,
    pub access_log_path: PathBuf,
}

#[derive(Serialize)]
pub struct WriteStatus {
    pub status: bool,
}

/// `GET /read_config-file`: the configuration file as raw text.
///
/// An unreadable file yields an empty body rather than an error, so the
/// front-end's editor simply starts blank.
pub async fn read_config_file(State(state): State<AdminState>) -> String {
    match tokio::fs::read_to_string(&state.config_path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                path = %state.config_path.display(),
                error = %e,
                "Configuration file not readable"
            );
            String::new()
        }
    }
}

/// `POST /write_config-file`: validate, persist and activate a replacement
/// configuration.
pub async fn write_config_file(
    State(state): State<AdminState>,
    Json(config): Json<ProxyConfig>,
) -> Result<Json<WriteStatus>, (StatusCode, String)> {
    if let Err(errors) = validate_config(&config) {
        let summary = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!(errors = %summary, "Rejecting configuration replacement");
        return Err((StatusCode::BAD_REQUEST, summary));
    }

    save_config(&state.config_path, &config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to persist configuration");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    state.config.replace(config);
    tracing::info!("Configuration replaced");

    Ok(Json(WriteStatus { status: true }))
}

/// `GET /info`: aggregated request counts per configured category.
pub async fn info(State(state): State<AdminState>) -> Response {
    let snapshot = state.config.load();
    match get_info(&state.access_log_path, &snapshot.categories).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Aggregation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "aggregation failed").into_response()
        }
    }
}
