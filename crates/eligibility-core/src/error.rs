//! Domain-level error types.

use thiserror::Error;

/// Use case errors - the closed set of failures a caller can observe.
///
/// Messages are surfaced verbatim to API clients, so they are part of the
/// contract.
#[derive(Debug, Error)]
pub enum UseCaseError {
    /// Malformed or missing input the caller can correct.
    #[error("{0}")]
    Validation(String),

    /// Authenticated, but the caller's grant does not cover the resource.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidClient(String),

    #[error("{0}")]
    InvalidScope(String),

    #[error("{0}")]
    InvalidRequest(String),

    /// Service misconfiguration, independent of anything the client sent.
    #[error("{0}")]
    ServerError(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Gateway-level errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Upstream service unavailable: {0}")]
    Unavailable(String),
}
