//! Authentication implementations.

mod jwt;
mod secret;

pub use jwt::{JwtConfig, JwtTokenService};
pub use secret::Argon2SecretVerifier;
