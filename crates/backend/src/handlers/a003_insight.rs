use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_insight::{InsightView, SelectCompanyRequest};

use crate::domain::a001_company::service as company_service;
use crate::shared::app_state::AppState;
use crate::shared::error::ApiError;

/// POST /api/insight/select
///
/// Ответ сразу в статусе `loading`; текст появится в GET позже.
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectCompanyRequest>,
) -> Result<Json<InsightView>, ApiError> {
    if request.viewer_id.trim().is_empty() {
        return Err(ApiError::BadRequest("viewerId is required".into()));
    }
    let company = company_service::get_by_id(&state.store, &request.company_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Company {} not found", request.company_id)))?;

    let (view, _task) = state.insights.select(&request.viewer_id, &company).await;
    Ok(Json(view))
}

/// GET /api/insight/:viewer_id
pub async fn get(
    State(state): State<AppState>,
    Path(viewer_id): Path<String>,
) -> Result<Json<InsightView>, ApiError> {
    state
        .insights
        .get(&viewer_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No company selected for {}", viewer_id)))
}

/// DELETE /api/insight/:viewer_id
pub async fn clear(State(state): State<AppState>, Path(viewer_id): Path<String>) -> StatusCode {
    if state.insights.clear(&viewer_id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
