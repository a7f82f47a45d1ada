//! Error handling middleware - maps failures onto the `errors` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use eligibility_core::error::{GatewayError, UseCaseError};
use eligibility_shared::ErrorResponse;

const INTERNAL_ERROR: &str = "An unexpected error occurred";
const SERVICE_UNAVAILABLE: &str = "The service is temporarily unavailable";

/// Application-level error type rendered as `{ "errors": [ { "title" } ] }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// The message is safe to show to clients.
    #[error("{0}")]
    Internal(String),

    /// Infrastructure failure; the detail is logged, never returned.
    #[error("{0}")]
    Gateway(GatewayError),
}

impl AppError {
    fn title(&self) -> String {
        match self {
            AppError::Gateway(GatewayError::Connection(_) | GatewayError::Unavailable(_)) => {
                SERVICE_UNAVAILABLE.to_string()
            }
            AppError::Gateway(_) => INTERNAL_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Gateway(GatewayError::Connection(_) | GatewayError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(detail) => tracing::error!(%detail, "Internal error"),
            AppError::Gateway(e) => tracing::error!(error = %e, "Gateway error"),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.title()))
    }
}

// Conversion from use case errors
impl From<UseCaseError> for AppError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Validation(msg)
            | UseCaseError::InvalidRequest(msg)
            | UseCaseError::InvalidScope(msg) => AppError::BadRequest(msg),
            UseCaseError::InvalidClient(msg) => AppError::Unauthenticated(msg),
            UseCaseError::Unauthorized(msg) => AppError::Forbidden(msg),
            UseCaseError::NotFound(msg) => AppError::NotFound(msg),
            UseCaseError::ServerError(msg) => AppError::Internal(msg),
            UseCaseError::Gateway(e) => AppError::Gateway(e),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
