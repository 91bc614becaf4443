//! Request DTOs for the API.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    /// Free-text project description.
    pub initial_input: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContinueSessionRequest {
    pub session_id: String,
    /// Answer to the pending question.
    pub user_response: String,
}

/// `GET /api/srs/:id` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrsQuery {
    /// `json` (default) or `markdown`.
    pub format: Option<String>,
}
