//! # Eligibility Core
//!
//! The domain layer of the eligibility checking API.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! scope validation, caller access, gateway ports and the use cases built on them.

pub mod access;
pub mod domain;
pub mod error;
pub mod ports;
pub mod scope;
pub mod usecases;

pub use access::{AccessScope, CallerAccess};
pub use error::{GatewayError, UseCaseError};
pub use scope::{ScopeSet, ScopeToken, validate_scopes};
