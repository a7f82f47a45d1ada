//! Authentication and authorization ports.

use async_trait::async_trait;

/// Lifetime of every issued access token.
pub const TOKEN_LIFETIME_MINUTES: i64 = 120;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Client id the token was issued to.
    pub subject: String,
    /// Space-delimited granted scope.
    pub scope: String,
    pub exp: i64,
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    /// Seconds until expiry.
    pub expires_in: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Sign a token for `subject` carrying `scope`.
    fn issue_token(&self, subject: &str, scope: &str) -> Result<IssuedToken, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Checks a presented client secret against the configured one.
pub trait SecretVerifier: Send + Sync {
    fn verify(&self, presented: &str, stored: &str) -> Result<bool, AuthError>;
}

/// A configured API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    /// Plain text secret or an Argon2 PHC string.
    pub secret: String,
    /// Space-delimited scopes the client may request.
    pub scope: String,
}

/// Lookup of configured clients.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn find_client(&self, client_id: &str) -> Option<ClientCredentials>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    /// Signing key or issuer not configured.
    #[error("Token service misconfigured: {0}")]
    Misconfigured(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
