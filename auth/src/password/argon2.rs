use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use crate::config::AuthConfig;

/// Password hashing implementation.
///
/// Argon2id with a per-call random salt. The PHC output embeds algorithm,
/// cost parameters and salt, so hashing the same input twice yields two
/// different strings that both verify.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with an explicit work factor.
    ///
    /// # Arguments
    /// * `iterations` - Argon2 time cost
    /// * `memory_kib` - Argon2 memory cost in KiB
    ///
    /// # Errors
    /// * `InvalidParameters` - Costs are outside the ranges Argon2 accepts
    pub fn new(iterations: u32, memory_kib: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self { params })
    }

    /// Create a hasher from the process authentication settings.
    pub fn from_config(config: &AuthConfig) -> Result<Self, PasswordError> {
        Self::new(config.password_cost, config.password_memory_kib)
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// PHC string format hash
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters are read back from the stored PHC string, so hashes made
    /// with an older cost setting keep verifying. The digest comparison is
    /// constant time.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small costs keep debug-mode tests fast.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(1, 1024).expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();

        let first = hasher.hash("same-input").unwrap();
        let second = hasher.hash("same-input").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-input", &first).unwrap());
        assert!(hasher.verify("same-input", &second).unwrap());
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = hasher().hash("plaintext-secret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plaintext-secret"));
    }

    #[test]
    fn test_hash_encodes_cost() {
        let hash = PasswordHasher::new(3, 2048).unwrap().hash("pw").unwrap();
        assert!(hash.contains("m=2048,t=3"));
    }

    #[test]
    fn test_verify_with_different_cost_hasher() {
        let hash = PasswordHasher::new(2, 2048).unwrap().hash("pw").unwrap();
        assert!(hasher().verify("pw", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let result = hasher().verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }

    #[test]
    fn test_invalid_parameters() {
        let result = PasswordHasher::new(0, 1024);
        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig::new("secret").with_password_cost(1, 1024);
        let hasher = PasswordHasher::from_config(&config).unwrap();

        let hash = hasher.hash("pw").unwrap();
        assert!(hash.contains("m=1024,t=1"));
    }
}
