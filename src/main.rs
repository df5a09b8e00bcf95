//! nomadisch-site server entry point.
//!
//! Starts the Axum HTTP server with the public and admin REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::http::StatusCode;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nomadisch_site::api;
use nomadisch_site::app_state::AppState;
use nomadisch_site::config::SiteConfig;
use nomadisch_site::media::MediaUploader;
use nomadisch_site::service::{AdminGuard, SiteService};
use nomadisch_site::store::{CacheWindow, StoreClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SiteConfig::from_env().context("invalid LISTEN_ADDR")?;
    tracing::info!(addr = %config.listen_addr, store = ?config.store, "starting nomadisch-site");

    // Build store and media clients
    let store = StoreClient::new(&config.store, config.http_timeout)
        .context("datastore client could not be configured")?;
    let uploader = match config.media.clone() {
        Some(media) => Some(MediaUploader::new(media, config.http_timeout)?),
        None => {
            tracing::warn!("media host not configured, uploads disabled");
            None
        }
    };
    if config.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD not set, admin routes will refuse every call");
    }

    // Build service layer
    let site_service = Arc::new(SiteService::new(
        store,
        AdminGuard::new(config.admin_password.clone()),
        uploader,
        CacheWindow::seconds(config.cache_window_secs),
    ));

    // Build router
    let app = api::build_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.http_timeout * 3,
                )),
        )
        .with_state(AppState { site_service });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
