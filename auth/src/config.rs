use std::fmt;

use serde::Deserialize;

/// Default token lifetime: one hour.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Default Argon2 iteration count (work factor).
pub const DEFAULT_PASSWORD_COST: u32 = 2;

/// Default Argon2 memory cost in KiB.
pub const DEFAULT_PASSWORD_MEMORY_KIB: u32 = 19 * 1024;

/// Process-wide authentication settings.
///
/// Built once at startup and handed by reference to
/// [`PasswordHasher::from_config`](crate::PasswordHasher::from_config) and
/// [`TokenService::from_config`](crate::TokenService::from_config).
/// Read-only afterwards; changing `jwt_secret` invalidates every token issued before.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: i64,

    #[serde(default = "default_password_cost")]
    pub password_cost: u32,

    #[serde(default = "default_password_memory_kib")]
    pub password_memory_kib: u32,
}

impl AuthConfig {
    /// Create settings with the given secret and default costs.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            password_cost: DEFAULT_PASSWORD_COST,
            password_memory_kib: DEFAULT_PASSWORD_MEMORY_KIB,
        }
    }

    /// Override the token lifetime.
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    /// Override the Argon2 iteration count and memory cost.
    pub fn with_password_cost(mut self, iterations: u32, memory_kib: u32) -> Self {
        self.password_cost = iterations;
        self.password_memory_kib = memory_kib;
        self
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("password_cost", &self.password_cost)
            .field("password_memory_kib", &self.password_memory_kib)
            .finish()
    }
}

fn default_token_ttl_seconds() -> i64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

fn default_password_cost() -> u32 {
    DEFAULT_PASSWORD_COST
}

fn default_password_memory_kib() -> u32 {
    DEFAULT_PASSWORD_MEMORY_KIB
}
