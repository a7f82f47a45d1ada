//! In-memory gateway implementations.
//!
//! Data lives for the lifetime of the process. Establishments can be seeded
//! from a JSON file; everything else starts empty.

mod applications;
mod audit;
mod checks;
mod establishments;

pub use applications::InMemoryApplicationGateway;
pub use audit::InMemoryAuditGateway;
pub use checks::InMemoryCheckGateway;
pub use establishments::{InMemoryEstablishmentGateway, LoadError};
