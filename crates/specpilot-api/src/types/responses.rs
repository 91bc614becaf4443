//! Response DTOs for the API.

use serde::Serialize;
use specpilot_models::SessionId;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Banner returned by `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    /// Text-generation provider in use (`stub` when no key is configured).
    pub provider: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub session_id: SessionId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionId>,
    pub total: usize,
}
