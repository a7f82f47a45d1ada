//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use eligibility_core::ports::{
    AuthError, IssuedToken, TOKEN_LIFETIME_MINUTES, TokenClaims, TokenService,
};

/// JWT token service configuration.
///
/// Both the secret and the issuer are required to sign tokens. The server
/// still boots without them; token issuance then fails as misconfigured.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub issuer: Option<String>,
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: None,
            expiration_minutes: TOKEN_LIFETIME_MINUTES,
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // client_id
    scope: String,
    exp: i64,
    iat: i64,
    iss: String,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT-based token service (HS256).
pub struct JwtTokenService {
    keys: Option<Keys>,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let keys = config
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|secret| Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            });

        Self { keys, config }
    }

    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let issuer = std::env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty());

        if secret.is_none() {
            tracing::error!("JWT_SECRET is not set. Token issuance will fail.");
        }
        if issuer.is_none() {
            tracing::error!("JWT_ISSUER is not set. Token issuance will fail.");
        }

        Self::new(JwtConfig {
            secret,
            issuer,
            expiration_minutes: TOKEN_LIFETIME_MINUTES,
        })
    }

    fn signing_parts(&self) -> Result<(&Keys, &str), AuthError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Misconfigured("JWT signing key is not configured".to_string()))?;
        let issuer = self
            .config
            .issuer
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::Misconfigured("JWT issuer is not configured".to_string()))?;
        Ok((keys, issuer))
    }
}

impl TokenService for JwtTokenService {
    fn issue_token(&self, subject: &str, scope: &str) -> Result<IssuedToken, AuthError> {
        let (keys, issuer) = self.signing_parts()?;

        let now = Utc::now();
        let exp = now + TimeDelta::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: subject.to_string(),
            scope: scope.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: issuer.to_string(),
        };

        let access_token = encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.config.expiration_minutes * 60,
        })
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (keys, issuer) = self.signing_parts()?;

        let mut validation = Validation::default();
        validation.set_issuer(&[issuer]);

        let token_data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(TokenClaims {
            subject: token_data.claims.sub,
            scope: token_data.claims.scope,
            exp: token_data.claims.exp,
        })
    }
}
