//! Health and root endpoints

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "telebridge",
    })
}

/// Root endpoint
///
/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "telebridge API",
        version: env!("CARGO_PKG_VERSION"),
    })
}
