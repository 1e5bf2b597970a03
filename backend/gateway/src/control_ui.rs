//! Front-end page server.

use std::path::Path;

use axum::Router;
use tower_http::services::ServeFile;

use crate::server::GatewayState;

/// Serves `<static_dir>/index.html` at `/`. A missing file answers 404.
pub fn ui_router(static_dir: &Path) -> Router<GatewayState> {
    Router::new().route_service("/", ServeFile::new(static_dir.join("index.html")))
}
