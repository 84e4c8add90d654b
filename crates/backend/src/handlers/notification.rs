use axum::{extract::State, Json};
use contracts::shared::notice::Notice;

use crate::shared::app_state::AppState;

/// GET /api/notification
///
/// `null`, если активного уведомления нет
pub async fn current(State(state): State<AppState>) -> Json<Option<Notice>> {
    Json(state.notices.current().await)
}
