use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::{TokenClaims, UserInfo};

use super::gate::AccessGate;
use super::verifier::AuthError;
use crate::shared::error::ApiError;

/// Токен из заголовка `Authorization: Bearer ...`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::Token("missing bearer token".into()))
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(
    State(gate): State<Arc<AccessGate>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = gate.validate(bearer_token(req.headers())?).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires admin privileges
pub async fn require_admin(
    State(gate): State<Arc<AccessGate>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = gate.validate(bearer_token(req.headers())?).await?;
    if !claims.is_admin {
        return Err(AuthError::Forbidden.into());
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Пользователь из claims, положенных `require_auth`/`require_admin`
pub struct CurrentUser(pub UserInfo);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<TokenClaims>()
            .ok_or_else(|| AuthError::Token("route is not protected by auth middleware".into()))?;
        Ok(CurrentUser(UserInfo {
            username: claims.sub.clone(),
            is_admin: claims.is_admin,
        }))
    }
}
