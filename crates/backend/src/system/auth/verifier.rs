use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use contracts::system::auth::UserInfo;
use thiserror::Error;

use crate::shared::config::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Sign in ticket is unknown, expired or already used")]
    UnknownTicket,

    #[error("Authentication is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid token: {0}")]
    Token(String),

    #[error("Administrator access required")]
    Forbidden,
}

/// Проверка пары логин/пароль
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    fn name(&self) -> &str;
}

fn require_both(username: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}

/// Демо-режим: подходит любая непустая пара
pub struct DemoVerifier;

#[async_trait]
impl CredentialVerifier for DemoVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        require_both(username, password)?;
        Ok(UserInfo {
            username: username.trim().to_string(),
            is_admin: true,
        })
    }

    fn name(&self) -> &str {
        "demo"
    }
}

/// Единственная учётная запись администратора из конфигурации
pub struct ConfiguredVerifier {
    username: String,
    password_hash: String,
}

impl ConfiguredVerifier {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Result<Self, AuthError> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash)
            .map_err(|e| AuthError::NotConfigured(format!("admin_password_hash: {}", e)))?;
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let username = config
            .admin_username
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::NotConfigured("admin_username is missing".into()))?;
        let hash = config
            .admin_password_hash
            .as_deref()
            .ok_or_else(|| AuthError::NotConfigured("admin_password_hash is missing".into()))?;
        Self::new(username, hash)
    }
}

#[async_trait]
impl CredentialVerifier for ConfiguredVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        require_both(username, password)?;
        if username.trim() != self.username {
            return Err(AuthError::InvalidCredentials);
        }

        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AuthError::NotConfigured(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(UserInfo {
                username: self.username.clone(),
                is_admin: true,
            }),
            Err(argon2::password_hash::Error::Password) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::warn!("Password verification failed: {}", e);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    fn name(&self) -> &str {
        "configured"
    }
}

/// Выбор проверяющего по флагу `auth.demo_mode`
pub fn from_config(config: &AuthConfig) -> Result<Box<dyn CredentialVerifier>, AuthError> {
    if config.demo_mode {
        Ok(Box::new(DemoVerifier))
    } else {
        Ok(Box::new(ConfiguredVerifier::from_config(config)?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use argon2::password_hash::SaltString;
    use argon2::PasswordHasher;
    use rand::Rng;

    pub(crate) fn hash_password(password: &str) -> String {
        let salt_bytes: [u8; 16] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt_bytes).unwrap();
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_demo_requires_both_fields() {
        let v = DemoVerifier;
        assert_eq!(v.verify("", "x").await, Err(AuthError::MissingCredentials));
        assert_eq!(v.verify("ann", "  ").await, Err(AuthError::MissingCredentials));
        let user = v.verify(" ann ", "pw").await.unwrap();
        assert_eq!(user.username, "ann");
    }

    #[tokio::test]
    async fn test_configured_checks_hash() {
        let v = ConfiguredVerifier::new("admin", hash_password("s3cret")).unwrap();
        assert!(v.verify("admin", "s3cret").await.unwrap().is_admin);
        assert_eq!(
            v.verify("admin", "wrong").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            v.verify("someone", "s3cret").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_configured_rejects_garbage_hash() {
        assert!(matches!(
            ConfiguredVerifier::new("admin", "plain-text"),
            Err(AuthError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_from_config_respects_demo_flag() {
        let mut config = crate::shared::config::Config::embedded().unwrap().auth;
        assert_eq!(from_config(&config).unwrap().name(), "demo");

        config.demo_mode = false;
        assert!(from_config(&config).is_err());

        config.admin_username = Some("admin".into());
        config.admin_password_hash = Some(hash_password("pw"));
        assert_eq!(from_config(&config).unwrap().name(), "configured");
    }
}
