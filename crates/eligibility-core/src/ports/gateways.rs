use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationPage, ApplicationQuery, ApplicationStatus, AuditType, BulkCheck,
    Establishment,
};
use crate::error::GatewayError;

/// Application storage.
///
/// Lookups return `Ok(None)` for absent records; `Err` is reserved for
/// infrastructure failures.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    async fn get_local_authority_id_for_application(
        &self,
        id: Uuid,
    ) -> Result<Option<i32>, GatewayError>;

    /// Owning local authority for each id that exists. Missing ids are
    /// absent from the map.
    async fn get_local_authority_ids_for_applications(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i32>, GatewayError>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, GatewayError>;

    async fn post_application(&self, application: Application)
    -> Result<Application, GatewayError>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, GatewayError>;

    /// Returns `false` if nothing was deleted.
    async fn delete_application(&self, id: Uuid) -> Result<bool, GatewayError>;

    async fn search_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<ApplicationPage, GatewayError>;

    /// Store the whole batch or nothing.
    async fn bulk_import_applications(
        &self,
        applications: Vec<Application>,
    ) -> Result<(), GatewayError>;

    /// Delete the whole batch or nothing; returns the number removed.
    async fn bulk_delete_applications(&self, ids: &[Uuid]) -> Result<usize, GatewayError>;
}

/// Establishment directory.
#[async_trait]
pub trait EstablishmentGateway: Send + Sync {
    async fn get_establishment(&self, urn: i32) -> Result<Option<Establishment>, GatewayError>;

    /// Establishments for the URNs that exist, in any order.
    async fn get_establishments_by_urns(
        &self,
        urns: &[i32],
    ) -> Result<Vec<Establishment>, GatewayError>;

    async fn get_multi_academy_trust_id_for_establishment(
        &self,
        urn: i32,
    ) -> Result<Option<i32>, GatewayError>;
}

/// Bulk eligibility check storage.
#[async_trait]
pub trait CheckEligibilityGateway: Send + Sync {
    async fn get_local_authority_id_for_bulk_check(
        &self,
        id: Uuid,
    ) -> Result<Option<i32>, GatewayError>;

    /// Bulk checks owned by any of `local_authority_ids`, or all of them
    /// when `None`. Deleted checks are excluded.
    async fn get_bulk_checks(
        &self,
        local_authority_ids: Option<&[i32]>,
    ) -> Result<Vec<BulkCheck>, GatewayError>;

    /// Returns `false` if the check did not exist.
    async fn delete_bulk_check(&self, id: Uuid) -> Result<bool, GatewayError>;
}

/// Audit trail.
#[async_trait]
pub trait AuditGateway: Send + Sync {
    async fn create_audit_entry(
        &self,
        audit_type: AuditType,
        type_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Uuid, GatewayError>;
}

/// Write an audit entry. A failed write is logged, never surfaced.
pub(crate) async fn record_audit(
    audit: &dyn AuditGateway,
    audit_type: AuditType,
    type_id: &str,
    metadata: Option<serde_json::Value>,
) {
    if let Err(e) = audit.create_audit_entry(audit_type, type_id, metadata).await {
        tracing::warn!(?audit_type, type_id, error = %e, "Failed to write audit entry");
    }
}
