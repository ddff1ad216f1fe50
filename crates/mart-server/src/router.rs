use axum::{routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, SiteState};

/// Build the axum router: liveness plus static files with SPA fallback.
pub fn build_router(config: &ServerConfig) -> Router {
    let site = SiteState {
        static_dir: config.static_dir.clone(),
        index_path: config.index_path(),
    };
    let assets = ServeDir::new(&config.static_dir).fallback(ServeFile::new(config.index_path()));

    Router::new()
        .route("/healthz", get(handler::health_handler))
        .with_state(site)
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
}
