use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding collapses every failure (bad signature, malformed, expired)
/// into `InvalidToken` so callers cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}
