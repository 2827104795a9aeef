//! # Server Module
//!
//! HTTP server setup and route configuration for the journal API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::data_access::ProgramAccessor;
use crate::notify::ToastLog;
use crate::routes::{health::ping, journal};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub program: Arc<ProgramAccessor>,
    pub toasts: Arc<ToastLog>,
}

/// Build the application router with every journal route mounted.
pub fn router(state: AppState) -> Router {
    let entry_routes = Router::new()
        .route(
            "/api/v1/entries",
            get(journal::list_entries).post(journal::create_entry),
        )
        .route(
            "/api/v1/entries/{address}",
            get(journal::get_entry)
                .put(journal::update_entry)
                .delete(journal::delete_entry),
        );

    Router::new()
        .route("/ping", get(ping))
        .route("/api/v1/program", get(journal::program_info))
        .route("/api/v1/notifications", get(journal::notifications))
        .merge(entry_routes)
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]),
            ),
        )
        .with_state(state)
}

/// Bind to `config.host:config.port` and serve until the process ends.
pub async fn start(config: &ServerConfig, state: AppState) -> Result<()> {
    let cluster = state.program.cluster().clone();
    let program_id = state.program.program_id();
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid server address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("Cruddapp server starting...");
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/ping", addr);
    tracing::info!("Journal endpoints available at http://{}/api/v1/entries", addr);
    tracing::info!("Cluster: {} ({})", cluster.name, cluster.endpoint);
    tracing::info!("Program: {}", program_id);

    axum::serve(listener, app).await.context("Server stopped unexpectedly")?;
    Ok(())
}
