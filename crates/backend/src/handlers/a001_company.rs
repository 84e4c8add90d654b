use axum::{
    extract::{Path, Query, State},
    Json,
};
use contracts::domain::a001_company::aggregate::{Company, CompanyDto, CompanyId};
use serde::Deserialize;
use serde_json::json;

use super::{parse_id, reported};
use crate::domain::a001_company::service::{self, UpsertOutcome};
use crate::shared::app_state::AppState;
use crate::shared::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/company?q=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Company>> {
    let companies = match query.q.as_deref() {
        Some(q) => service::search(&state.store, q).await,
        None => service::list_all(&state.store).await,
    };
    Json(companies)
}

/// GET /api/company/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Company>, ApiError> {
    let id: CompanyId = parse_id(&id)?;
    service::get_by_id(&state.store, &id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Company {} not found", id)))
}

/// POST /api/company (admin)
pub async fn upsert(
    State(state): State<AppState>,
    Json(dto): Json<CompanyDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (id, outcome) = reported(&state, service::upsert(&state.store, dto).await).await?;
    let message = match outcome {
        UpsertOutcome::Created => "Company added successfully",
        UpsertOutcome::Updated => "Company updated successfully",
    };
    state.notices.success(message).await;
    Ok(Json(json!({ "id": id })))
}
