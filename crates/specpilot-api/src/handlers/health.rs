//! Health and banner handlers.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::{HealthResponse, ServiceInfo};

/// GET /health - Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.config.uptime_seconds(),
    })
}

/// GET / - Service banner.
pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "SpecPilot".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.service.workflow().provider_name().to_string(),
        status: "running".to_string(),
    })
}
