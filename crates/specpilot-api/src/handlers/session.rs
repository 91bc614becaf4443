//! Session lifecycle handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use specpilot_models::SessionId;
use specpilot_orchestrator::{CollectedInfoView, QualityView, SessionSnapshot, SessionStatus};

use crate::error::Result;
use crate::state::AppState;
use crate::types::{
    ContinueSessionRequest, MessageResponse, SessionListResponse, StartSessionRequest,
};

/// POST /api/session/start - Start a session from a project description.
pub async fn start_session(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionSnapshot>)> {
    let Json(req) = payload?;
    let snapshot = state.service.start_session(&req.initial_input).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// POST /api/session/continue - Answer the pending question.
pub async fn continue_session(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContinueSessionRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>> {
    let Json(req) = payload?;
    let id = SessionId::from(req.session_id);
    let snapshot = state
        .service
        .continue_session(&id, &req.user_response)
        .await?;
    Ok(Json(snapshot))
}

/// GET /api/session/:id/status
pub async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatus>> {
    Ok(Json(state.service.status(&SessionId::from(id)).await?))
}

/// GET /api/session/:id/collected-info
pub async fn collected_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CollectedInfoView>> {
    Ok(Json(state.service.collected_info(&SessionId::from(id)).await?))
}

/// GET /api/session/:id/quality
pub async fn session_quality(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QualityView>> {
    Ok(Json(state.service.quality(&SessionId::from(id)).await?))
}

/// POST /api/session/:id/reset - Discard a session.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = SessionId::from(id);
    state.service.reset_session(&id).await?;
    Ok(Json(MessageResponse {
        session_id: id,
        message: "session reset".to_string(),
    }))
}

/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionListResponse>> {
    let sessions = state.service.list_sessions().await?;
    let total = sessions.len();
    Ok(Json(SessionListResponse { sessions, total }))
}
