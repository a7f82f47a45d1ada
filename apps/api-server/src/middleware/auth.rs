//! Authentication extractor.

use std::future::{Ready, ready};

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, http::StatusCode, http::header, web,
};

use eligibility_core::ports::{AuthError, TokenClaims, TokenService};
use eligibility_core::scope::LOCAL_AUTHORITY;
use eligibility_core::{AccessScope, CallerAccess, ScopeSet};
use eligibility_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Scope required by the application endpoints.
pub const APPLICATION_SCOPE: &str = "application";
/// Scope required by the bulk check endpoints.
pub const BULK_CHECK_SCOPE: &str = "bulk_check";

/// Authenticated client identity taken from a bearer token.
///
/// ```ignore
/// async fn handler(identity: Identity) -> AppResult<HttpResponse> {
///     identity.require_scope(APPLICATION_SCOPE)?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub client_id: String,
    pub scopes: ScopeSet,
}

impl Identity {
    pub fn require_scope(&self, scope: &str) -> Result<(), AppError> {
        if self.scopes.has(scope) {
            Ok(())
        } else {
            tracing::warn!(client_id = %self.client_id, scope, "Token lacks required scope");
            Err(AppError::Forbidden(format!(
                "The access token does not grant the '{scope}' scope"
            )))
        }
    }

    pub fn local_authorities(&self) -> AccessScope {
        AccessScope::from_scopes(&self.scopes, LOCAL_AUTHORITY)
    }

    pub fn access(&self) -> CallerAccess {
        CallerAccess::from_scopes(&self.scopes)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            scopes: ScopeSet::parse(&claims.scope),
            client_id: claims.subject,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let title = match &self.0 {
            AuthError::TokenExpired => "The access token has expired".to_string(),
            AuthError::InvalidToken(_) => "The access token is invalid".to_string(),
            AuthError::MissingAuth => {
                "A bearer token is required in the Authorization header".to_string()
            }
            other => {
                tracing::error!(error = %other, "Token validation unavailable");
                "Token validation is not configured".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(title))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AuthenticationError(AuthError::Misconfigured(
                "application state missing".to_string(),
            ))));
        };

        let result = bearer_token(req)
            .and_then(|token| state.tokens.validate_token(token))
            .map(Identity::from)
            .map_err(|e| {
                tracing::debug!(error = %e, "Bearer token rejected");
                AuthenticationError(e)
            });

        ready(result)
    }
}
