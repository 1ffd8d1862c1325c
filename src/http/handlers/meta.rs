//! Root banner and health check.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::state::AppState;

/// Root banner body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}

/// `GET /` — liveness banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Assembly management API".to_string(),
        status: "running".to_string(),
    })
}

/// `GET /health` — connectivity probe. Always 200; the store state is
/// reported in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.store.ping().await {
        Ok(true) => "connected",
        Ok(false) | Err(_) => "unreachable",
    };
    Json(HealthResponse {
        status: if database == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp: Utc::now().to_rfc3339(),
        database: database.to_string(),
    })
}
