//! Client secret verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use subtle::ConstantTimeEq;

use eligibility_core::ports::{AuthError, SecretVerifier};

const ARGON2_PREFIX: &str = "$argon2";

/// Verifies client secrets stored either as Argon2 PHC strings or as
/// plain text.
pub struct Argon2SecretVerifier {
    argon2: Argon2<'static>,
}

impl Argon2SecretVerifier {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a secret for storage in client configuration.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }
}

impl Default for Argon2SecretVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretVerifier for Argon2SecretVerifier {
    fn verify(&self, presented: &str, stored: &str) -> Result<bool, AuthError> {
        if !stored.starts_with(ARGON2_PREFIX) {
            return Ok(presented.as_bytes().ct_eq(stored.as_bytes()).into());
        }

        let parsed_hash =
            PasswordHash::new(stored).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(presented.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
