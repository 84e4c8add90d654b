use axum::{
    extract::{Path, State},
    Json,
};
use contracts::domain::a001_company::aggregate::{Company, CompanyId, SlotId};
use contracts::domain::a002_booking::{
    BookSlotRequest, BookingHistoryEntry, CancelSlotRequest, LedgerSummary,
};

use super::{parse_id, reported};
use crate::domain::a002_booking::service;
use crate::shared::app_state::AppState;
use crate::shared::error::ApiError;

fn parse_path(company_id: &str, slot_id: &str) -> Result<(CompanyId, SlotId), ApiError> {
    Ok((parse_id(company_id)?, parse_id(slot_id)?))
}

/// POST /api/company/:id/slots/:slot_id/book
pub async fn book(
    State(state): State<AppState>,
    Path((company_id, slot_id)): Path<(String, String)>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<Company>, ApiError> {
    let (company_id, slot_id) = reported(&state, parse_path(&company_id, &slot_id)).await?;
    let occupant = request.occupant.display_name().to_string();

    let company = reported(
        &state,
        service::book(&state.store, &company_id, &slot_id, request).await,
    )
    .await?;

    state
        .notices
        .success(format!(
            "Successfully booked a slot at {} for {}!",
            company.details.name, occupant
        ))
        .await;
    Ok(Json(company))
}

/// POST /api/company/:id/slots/:slot_id/cancel
///
/// Тело необязательно: `{"expectedVersion": n}`
pub async fn cancel(
    State(state): State<AppState>,
    Path((company_id, slot_id)): Path<(String, String)>,
    request: Option<Json<CancelSlotRequest>>,
) -> Result<Json<Company>, ApiError> {
    let (company_id, slot_id) = reported(&state, parse_path(&company_id, &slot_id)).await?;
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let company = reported(
        &state,
        service::cancel(&state.store, &company_id, &slot_id, request).await,
    )
    .await?;

    state.notices.success("Booking cancelled successfully.").await;
    Ok(Json(company))
}

/// GET /api/bookings
pub async fn history(State(state): State<AppState>) -> Json<Vec<BookingHistoryEntry>> {
    Json(service::history(&state.store).await)
}

/// GET /api/bookings/summary
pub async fn summary(State(state): State<AppState>) -> Json<LedgerSummary> {
    Json(service::summary(&state.store).await)
}
