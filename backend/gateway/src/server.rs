//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use glyphgate_understanding::OcrService;

use crate::control_ui;
use crate::ocr_api;

/// Default request body cap; data-URIs of phone photos easily exceed axum's 2 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across routes. Read-only after startup.
#[derive(Clone)]
pub struct GatewayState {
    pub ocr: Arc<OcrService>,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl GatewayState {
    pub fn new(ocr: Arc<OcrService>) -> Self {
        Self {
            ocr,
            static_dir: PathBuf::from("."),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Build the router with every route and layer the server uses.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/run-ocr", post(ocr_api::run_ocr))
        .route("/api/health", get(health))
        .merge(control_ui::ui_router(&state.static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "glyphgate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Binds `addr` and serves until the process is stopped.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    info!(
        provider = state.ocr.generator_name(),
        static_dir = %state.static_dir.display(),
        "Building gateway routes"
    );
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
