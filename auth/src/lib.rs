//! Authentication utilities library
//!
//! Provides the stateless authentication primitives used by the account service:
//! - Password hashing (Argon2id)
//! - JWT encoding and decoding
//! - Token issuance and verification
//!
//! All of them are configured from a single [`AuthConfig`] built at startup.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(1, 1024).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{AuthConfig, TokenService};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!");
//! let tokens = TokenService::from_config(&config);
//! let token = tokens.issue("user123", "USER").unwrap();
//! let identity = tokens.verify(&token).unwrap();
//! assert_eq!(identity.role, "USER");
//! ```

pub mod config;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use config::AuthConfig;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenIdentity;
pub use token::TokenService;
