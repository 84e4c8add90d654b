use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use chrono::Duration;
use contracts::shared::notice::NoticeKind;
use contracts::system::auth::{LoginRequest, LoginResponse, SignInRequest, SignInResponse, UserInfo};

use crate::handlers::reported;
use crate::shared::app_state::AppState;
use crate::shared::error::ApiError;
use crate::system::auth::middleware::{bearer_token, CurrentUser};

const SIGN_IN_NOTICE_SECS: i64 = 2;

/// Sign-in handler (шаг 1)
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    let ticket = reported(
        &state,
        state.gate.sign_in(&request.username, &request.password).await,
    )
    .await?;

    let message = "Sign in is completed".to_string();
    state
        .notices
        .post_for(
            NoticeKind::Success,
            message.clone(),
            Duration::seconds(SIGN_IN_NOTICE_SECS),
        )
        .await;
    Ok(Json(SignInResponse { ticket, message }))
}

/// Login handler (шаг 2)
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = reported(&state, state.gate.login(request).await).await?;
    state
        .notices
        .success(format!("Welcome back, {}!", response.user.username))
        .await;
    Ok(Json(response))
}

/// Logout handler
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    state.gate.logout(token).await?;
    state.notices.success("Logged out successfully").await;
    Ok(StatusCode::OK)
}

/// Get current user handler (protected by middleware)
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(user)
}
