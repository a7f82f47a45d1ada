//! Domain entities - the core business objects.

mod application;
mod audit;
mod bulk;
mod bulk_check;
mod establishment;

pub use application::{
    Application, ApplicationPage, ApplicationQuery, ApplicationStatus, NewApplication,
};
pub use audit::{AuditEntry, AuditType};
pub use bulk::{ApplicationImportRow, BulkDeleteResult, BulkImportResult, FileFormat, UploadedFile};
pub use bulk_check::{BulkCheck, BulkCheckStatus};
pub use establishment::Establishment;
