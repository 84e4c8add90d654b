use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use contracts::system::auth::{TokenClaims, UserInfo};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use super::verifier::AuthError;

/// Допуск по времени при проверке `exp`
pub const LEEWAY_SECS: u64 = 60;

/// Выпустить access-токен (HS256)
pub fn generate_access_token(
    user: &UserInfo,
    secret: &str,
    lifetime: Duration,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AuthError::Token("token lifetime is out of range".into()))?;
    let claims = TokenClaims {
        sub: user.username.clone(),
        is_admin: user.is_admin,
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Token(e.to_string()))
}

/// Проверить подпись и срок действия токена
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = LEEWAY_SECS;
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::Token(e.to_string()))
}

/// Generate a cryptographically secure JWT secret (256 bits)
pub fn generate_jwt_secret() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}
