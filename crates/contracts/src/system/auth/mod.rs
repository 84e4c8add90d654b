use serde::{Deserialize, Serialize};

/// Первый шаг входа: проверка пары логин/пароль
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Одноразовый билет для второго шага
    pub ticket: String,
    pub message: String,
}

/// Второй шаг входа. Пустые поля берутся из первого шага.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub ticket: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // username
    pub is_admin: bool,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
    /// Уникальный ID токена; по нему же ведётся отзыв
    pub jti: String,
}
