use bcrypt::BcryptError;
use bcrypt::DEFAULT_COST;

use super::errors::PasswordError;

/// Password hashing implementation (internally uses bcrypt).
///
/// Verification reads the variant, cost, and salt embedded in the stored
/// hash string, so hashes minted under older cost factors keep verifying.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a random salt at the default cost.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular-crypt hash string (variant, cost, salt, and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, DEFAULT_COST)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash in constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored bcrypt hash string
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `InvalidHash` - Stored hash is not a bcrypt string
    /// * `VerificationFailed` - Verification could not run
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| match e {
            BcryptError::InvalidHash(hash) => PasswordError::InvalidHash(hash),
            other => PasswordError::VerificationFailed(other.to_string()),
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
