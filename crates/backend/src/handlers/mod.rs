pub mod a001_company;
pub mod a002_booking;
pub mod a003_insight;
pub mod notification;

use contracts::domain::common::AggregateId;

use crate::shared::app_state::AppState;
use crate::shared::error::ApiError;

/// Ошибка операции дублируется в уведомление
pub(crate) async fn reported<T, E>(state: &AppState, result: Result<T, E>) -> Result<T, ApiError>
where
    E: Into<ApiError>,
{
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            let e: ApiError = e.into();
            state.notices.error(e.to_string()).await;
            Err(e)
        }
    }
}

/// Разбор ID из пути
pub(crate) fn parse_id<T: AggregateId>(raw: &str) -> Result<T, ApiError> {
    T::from_string(raw).map_err(ApiError::BadRequest)
}
