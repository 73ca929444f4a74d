//! Authentication service for registration, login, and token management

use std::collections::HashMap;
use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// Shortest password accepted on registration or change
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Authentication service backed by an in-memory credential map
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<RwLock<HashMap<String, String>>>,
    jwt_secret: String,
    token_expiry: i64,
    allow_registration: bool,
    hash_cost: u32,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub username: String,
}

impl AuthService {
    /// Create the service and seed the configured default account
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        Self::with_cost(config, DEFAULT_COST)
    }

    pub(crate) fn with_cost(config: &AuthConfig, hash_cost: u32) -> AppResult<Self> {
        let mut credentials = HashMap::new();
        credentials.insert(
            config.default_username.clone(),
            hash_password(&config.default_password, hash_cost)?,
        );

        Ok(Self {
            credentials: Arc::new(RwLock::new(credentials)),
            jwt_secret: config.jwt_secret.clone(),
            token_expiry: config.token_expiry,
            allow_registration: config.allow_registration,
            hash_cost,
        })
    }

    /// Create an account and log it in
    pub async fn register(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        if !self.allow_registration {
            return Err(AppError::Forbidden("Registration is disabled".to_string()));
        }

        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username must not be empty".to_string(),
            });
        }
        Self::check_password(password)?;

        let password_hash = hash_password(password, self.hash_cost)?;

        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(username) {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }
        credentials.insert(username.to_string(), password_hash);
        drop(credentials);

        tracing::info!("Registered user {}", username);
        self.generate_tokens(username)
    }

    /// Authenticate with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        if !self.verify_credentials(username, password).await? {
            tracing::warn!("Rejected login for {}", username);
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("User {} logged in", username);
        self.generate_tokens(username)
    }

    /// Replace a password after checking the current one
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        Self::check_password(new_password)?;
        if !self.verify_credentials(username, current_password).await? {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(new_password, self.hash_cost)?;
        self.credentials
            .write()
            .await
            .insert(username.to_string(), password_hash);

        tracing::info!("Password changed for {}", username);
        Ok(())
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }

    async fn verify_credentials(&self, username: &str, password: &str) -> AppResult<bool> {
        let credentials = self.credentials.read().await;
        let Some(password_hash) = credentials.get(username) else {
            return Ok(false);
        };

        verify(password, password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }

    /// Generate an access token for `username`
    fn generate_tokens(&self, username: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.token_expiry);

        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_expiry,
            username: username.to_string(),
        })
    }

    fn check_password(password: &str) -> AppResult<()> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                ),
            });
        }
        Ok(())
    }
}

fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        // Minimum bcrypt cost keeps the tests fast
        AuthService::with_cost(&AuthConfig::default(), 4).unwrap()
    }

    #[tokio::test]
    async fn test_default_user_can_log_in() {
        let auth = service();
        let tokens = auth.login("admin", "signcraft3d").await.unwrap();
        assert_eq!(tokens.token_type, "Bearer");

        let claims = auth.validate_token(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let auth = service();
        assert!(matches!(
            auth.login("admin", "nope").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "signcraft3d").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        auth.register("shopfront", "neon42").await.unwrap();
        assert!(auth.login("shopfront", "neon42").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_and_short_password() {
        let auth = service();
        assert!(matches!(
            auth.register("admin", "whatever").await,
            Err(AppError::DuplicateEntry(_))
        ));
        assert!(matches!(
            auth.register("newuser", "abc").await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_registration_can_be_disabled() {
        let config = AuthConfig {
            allow_registration: false,
            ..AuthConfig::default()
        };
        let auth = AuthService::with_cost(&config, 4).unwrap();
        assert!(matches!(
            auth.register("newuser", "secret").await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service();
        assert!(matches!(
            auth.change_password("admin", "wrong", "fresh-pass").await,
            Err(AppError::Unauthorized(_))
        ));

        auth.change_password("admin", "signcraft3d", "fresh-pass")
            .await
            .unwrap();
        assert!(auth.login("admin", "signcraft3d").await.is_err());
        assert!(auth.login("admin", "fresh-pass").await.is_ok());
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let auth = service();
        let tokens = auth.generate_tokens("admin").unwrap();
        let tampered = format!("{}x", tokens.access_token);
        assert!(matches!(
            auth.validate_token(&tampered),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let config = AuthConfig {
            token_expiry: -3600,
            ..AuthConfig::default()
        };
        let auth = AuthService::with_cost(&config, 4).unwrap();
        let tokens = auth.generate_tokens("admin").unwrap();
        assert!(matches!(
            auth.validate_token(&tokens.access_token),
            Err(AppError::TokenExpired)
        ));
    }
}
