//! # Eligibility Infrastructure
//!
//! Concrete implementations of the ports defined in `eligibility-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory gateways and client registry only
//! - `auth` - JWT token signing and Argon2 client secrets

pub mod clients;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

pub use clients::EnvClientRegistry;
pub use memory::{
    InMemoryApplicationGateway, InMemoryAuditGateway, InMemoryCheckGateway,
    InMemoryEstablishmentGateway, LoadError,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2SecretVerifier, JwtConfig, JwtTokenService};
