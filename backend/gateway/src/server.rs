//! Main HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use recipesnap_config::ServerConfig;
use recipesnap_core::UploadPipeline;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::{control_ui, health_api, upload};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: UploadPipeline,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl GatewayState {
    pub fn new(pipeline: UploadPipeline, server: &ServerConfig) -> Self {
        Self {
            pipeline,
            static_dir: server.static_dir.clone(),
            max_upload_bytes: server.max_upload_bytes,
        }
    }
}

pub fn build_router(state: GatewayState) -> Router {
    let uploads = Router::new()
        .route("/extract", post(upload::extract_recipe))
        .route("/api/recipes/extract", post(upload::extract_recipe))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .route("/", get(control_ui::index))
        .route("/api/health", get(health_api::get_health))
        .merge(uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("RecipeSnap listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
