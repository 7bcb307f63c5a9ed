use axum::Json;
use serde::{Deserialize, Serialize};

/// Version reported by `GET /health`.
pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Handler: GET /health
///
/// Liveness only; does not contact the provider.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: API_VERSION.into(),
    })
}
