use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::a001_company::ledger::LedgerError;
use crate::system::auth::AuthError;

/// Ошибка HTTP-обработчика; тело ответа `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(e) => match e {
                LedgerError::CompanyNotFound(_) | LedgerError::SlotNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                LedgerError::AlreadyBooked(_)
                | LedgerError::NotBooked(_)
                | LedgerError::VersionConflict { .. }
                | LedgerError::DuplicateCompany(_) => StatusCode::CONFLICT,
                LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::Auth(e) => match e {
                AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                AuthError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::InvalidCredentials | AuthError::UnknownTicket | AuthError::Token(_) => {
                    StatusCode::UNAUTHORIZED
                }
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{} {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
