//! Transparent Forward HTTP Proxy
//!
//! A forward proxy with categorized access logging, built with Tokio and
//! Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────────┐
//!                       │                  FORWARD PROXY                     │
//!                       │                                                    │
//!     Client Request    │  ┌──────────┐   ┌──────────┐   ┌──────────────┐   │
//!     ──────────────────┼─▶│  proxy   │──▶│ classify │──▶│  accesslog   │   │
//!     (absolute URI)    │  │ listener │   │ resolver │   │ writer task  │   │
//!                       │  └────┬─────┘   └──────────┘   └──────┬───────┘   │
//!                       │       │                               │           │
//!                       │       ▼                               ▼           │
//!                       │  ┌──────────┐   ┌──────────┐      access.log      │
//!                       │  │ header   │──▶│ upstream │          │           │
//!                       │  │sanitizer │   │  client  │──────────┼───────────┼──── Destination
//!     Client Response   │  └──────────┘   └────┬─────┘          │           │        Host
//!     ◀─────────────────┼───────────────────────┘               │           │
//!                       │                                       │           │
//!                       │  ┌─────────────────────────────────────────────┐  │
//!                       │  │                admin listener               │  │
//!                       │  │  read/write config-file · /info report ─────┼──┼──── reads
//!                       │  └──────────────────┬──────────────────────────┘  │
//!                       │                     │                             │
//!                       │  ┌──────────┐       ▼                             │
//!                       │  │ watcher  │──▶ config store (atomic snapshots)  │
//!                       │  └──────────┘                                     │
//!                       └───────────────────────────────────────────────────┘
//! ```
//!
//! Two listeners run side by side: the proxy listener relays absolute-URI
//! requests to their destinations, the admin listener exposes the
//! configuration and the per-category traffic report.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use forward_proxy::accesslog::AccessLogWriter;
use forward_proxy::admin::{self, AdminState};
use forward_proxy::config::{load_config, ConfigStore, ConfigWatcher, ProxyConfig};
use forward_proxy::http::server::{upstream_connector, AppState};
use forward_proxy::observability;
use forward_proxy::HttpServer;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "forward-proxy",
    about = "Transparent forward HTTP proxy with categorized access logging"
)]
struct Args {
    /// Address the proxy listener binds to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Address the admin API binds to.
    #[arg(long, default_value = "0.0.0.0:4300")]
    admin_addr: String,

    /// Path of the JSON configuration file.
    #[arg(long, default_value = "user-config.json")]
    config: PathBuf,

    /// Directory with the admin front-end build, served when present.
    #[arg(long, default_value = "dist")]
    assets_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();
    let args = Args::parse();

    tracing::info!("forward-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    // A broken or absent configuration must not keep the proxy from
    // forwarding; it starts uncategorized instead.
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %args.config.display(),
                error = %e,
                "Starting with empty configuration"
            );
            ProxyConfig::default()
        }
    };
    let access_log_path = PathBuf::from(&config.settings.access_log);

    tracing::info!(
        categories = config.categories.len(),
        sites = config.sites.len(),
        access_log = %access_log_path.display(),
        "Configuration loaded"
    );

    let store = ConfigStore::new(config);
    let (access_log, writer_task) = AccessLogWriter::spawn(&access_log_path);

    // Hot reload covers external edits and the admin surface's own
    // writes alike; both funnel through the same validation.
    let (watcher, mut config_updates) = ConfigWatcher::new(&args.config);
    let _watch_guard = match watcher.run() {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!(error = %e, "Configuration watcher unavailable");
            None
        }
    };
    let reload_store = store.clone();
    tokio::spawn(async move {
        while let Some(config) = config_updates.recv().await {
            reload_store.replace(config);
            tracing::info!("Configuration reloaded");
        }
    });

    let proxy_listener = TcpListener::bind(&args.addr).await?;
    let admin_listener = TcpListener::bind(&args.admin_addr).await?;

    let proxy = HttpServer::new(AppState {
        config: store.clone(),
        access_log,
        connector: upstream_connector(),
    });
    let admin_router = admin::setup_admin_router(
        AdminState {
            config: store,
            config_path: args.config.clone(),
            access_log_path,
        },
        &args.assets_dir,
    );

    tokio::try_join!(
        proxy.run(proxy_listener),
        admin::serve(admin_listener, admin_router),
    )?;

    // Listeners are down and their states dropped; the writer drains
    // whatever is still queued before we exit.
    writer_task.await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
