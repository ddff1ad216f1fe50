use std::path::PathBuf;

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

/// Paths the liveness check inspects.
#[derive(Clone, Debug)]
pub struct SiteState {
    pub static_dir: PathBuf,
    pub index_path: PathBuf,
}

/// Liveness report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub static_dir: String,
    /// Whether the entry document exists on disk.
    pub index_present: bool,
}

/// Health check handler.
pub async fn health_handler(State(site): State<SiteState>) -> Json<HealthResponse> {
    let index_present = tokio::fs::metadata(&site.index_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        static_dir: site.static_dir.display().to_string(),
        index_present,
    })
}
