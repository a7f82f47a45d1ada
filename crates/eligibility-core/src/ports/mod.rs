//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod gateways;

pub use auth::{
    AuthError, ClientCredentials, ClientRegistry, IssuedToken, SecretVerifier, TOKEN_LIFETIME_MINUTES,
    TokenClaims, TokenService,
};
pub use gateways::{ApplicationGateway, AuditGateway, CheckEligibilityGateway, EstablishmentGateway};

pub(crate) use gateways::record_audit;
