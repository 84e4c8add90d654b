use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use contracts::system::auth::{LoginRequest, LoginResponse, TokenClaims, UserInfo};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::jwt;
use super::verifier::{self, AuthError, CredentialVerifier};
use crate::shared::config::AuthConfig;

/// Сколько живёт билет между sign-in и login
const TICKET_TTL_SECS: i64 = 300;

struct PendingSignIn {
    user: UserInfo,
    issued_at: DateTime<Utc>,
}

/// Двухшаговый вход: sign-in выдаёт билет, login обменивает его на токен
pub struct AccessGate {
    verifier: Box<dyn CredentialVerifier>,
    tickets: RwLock<HashMap<String, PendingSignIn>>,
    /// SHA-256 отозванного токена -> его `exp`
    revoked: RwLock<HashMap<String, usize>>,
    secret: String,
    token_lifetime: Duration,
    ticket_ttl: Duration,
}

impl AccessGate {
    pub fn new(
        verifier: Box<dyn CredentialVerifier>,
        secret: impl Into<String>,
        token_lifetime: Duration,
    ) -> Self {
        Self {
            verifier,
            tickets: RwLock::new(HashMap::new()),
            revoked: RwLock::new(HashMap::new()),
            secret: secret.into(),
            token_lifetime,
            ticket_ttl: Duration::seconds(TICKET_TTL_SECS),
        }
    }

    pub fn with_ticket_ttl(mut self, ttl: Duration) -> Self {
        self.ticket_ttl = ttl;
        self
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let token_lifetime = Duration::try_hours(config.token_lifetime_hours)
            .filter(|lifetime| *lifetime > Duration::zero())
            .ok_or_else(|| {
                AuthError::NotConfigured(format!(
                    "token_lifetime_hours {} is out of range",
                    config.token_lifetime_hours
                ))
            })?;
        let verifier = verifier::from_config(config)?;
        let secret = match config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => jwt::generate_jwt_secret(),
        };
        tracing::info!("Access gate uses {} credentials", verifier.name());
        Ok(Self::new(verifier, secret, token_lifetime))
    }

    fn ticket_expired(&self, pending: &PendingSignIn, now: DateTime<Utc>) -> bool {
        pending.issued_at + self.ticket_ttl <= now
    }

    /// Шаг 1: проверить учётные данные и выдать одноразовый билет.
    /// Просроченные билеты удаляются здесь же.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self.verifier.verify(username, password).await?;
        let ticket = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tickets = self.tickets.write().await;
        tickets.retain(|_, pending| !self.ticket_expired(pending, now));
        tickets.insert(
            ticket.clone(),
            PendingSignIn {
                user,
                issued_at: now,
            },
        );
        Ok(ticket)
    }

    /// Шаг 2: погасить билет. Переданные данные проверяются заново,
    /// отсутствующие берутся из первого шага.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let pending = self
            .tickets
            .write()
            .await
            .remove(&request.ticket)
            .ok_or(AuthError::UnknownTicket)?;
        if self.ticket_expired(&pending, Utc::now()) {
            return Err(AuthError::UnknownTicket);
        }
        let signed_in = pending.user;

        let username = request
            .username
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| signed_in.username.clone());
        let user = match request.password.filter(|s| !s.is_empty()) {
            Some(password) => self.verifier.verify(&username, &password).await?,
            None if username.trim() == signed_in.username => signed_in,
            None => return Err(AuthError::MissingCredentials),
        };

        let access_token = jwt::generate_access_token(&user, &self.secret, self.token_lifetime)?;
        tracing::info!("User {} logged in", user.username);
        Ok(LoginResponse { access_token, user })
    }

    /// Проверить токен (подпись, срок, отзыв)
    pub async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        if self.revoked.read().await.contains_key(&hash_token(token)) {
            return Err(AuthError::Token("token has been revoked".into()));
        }
        jwt::validate_token(token, &self.secret)
    }

    /// Отозвать действующий токен. Записи об отзыве хранятся,
    /// пока токен мог бы пройти проверку срока.
    pub async fn logout(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.validate(token).await?;
        let now = Utc::now().timestamp().max(0) as usize;

        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp + jwt::LEEWAY_SECS as usize >= now);
        revoked.insert(hash_token(token), claims.exp);
        tracing::info!("User {} logged out", claims.sub);
        Ok(claims)
    }
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
