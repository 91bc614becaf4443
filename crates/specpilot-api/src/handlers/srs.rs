//! SRS export handler.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use specpilot_models::SessionId;
use specpilot_orchestrator::{SrsExport, SrsFormat};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::SrsQuery;

/// GET /api/srs/:id?format=json|markdown
pub async fn get_srs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SrsQuery>,
) -> Result<Json<SrsExport>> {
    let format = match query.format.as_deref() {
        None => SrsFormat::default(),
        Some(raw) => raw.parse::<SrsFormat>().map_err(ApiError::BadRequest)?,
    };
    let export = state.service.get_srs(&SessionId::from(id), format).await?;
    Ok(Json(export))
}
