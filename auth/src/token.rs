use chrono::Duration;
use chrono::Utc;

use crate::config::AuthConfig;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub subject: String,
    pub role: String,
}

/// Issues and verifies time-bounded access tokens.
///
/// Stateless: a token is valid when its signature matches the configured
/// secret and its expiry has not passed. Nothing is stored server-side.
pub struct TokenService {
    jwt_handler: JwtHandler,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret
    /// * `ttl` - Lifetime of issued tokens
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            ttl,
        }
    }

    /// Create a token service from the process authentication settings.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::seconds(config.token_ttl_seconds),
        )
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for a subject and role.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, subject: impl ToString, role: impl ToString) -> Result<String, JwtError> {
        let claims = Claims::new(subject, role, Utc::now(), self.ttl);
        self.jwt_handler.encode(&claims)
    }

    /// Verify a token and return the identity it carries.
    ///
    /// # Errors
    /// * `InvalidToken` - Any verification failure; the cause is not exposed
    pub fn verify(&self, token: &str) -> Result<TokenIdentity, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        Ok(TokenIdentity {
            subject: claims.sub,
            role: claims.role,
        })
    }
}
