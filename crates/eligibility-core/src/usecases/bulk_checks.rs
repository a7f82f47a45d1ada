//! Bulk eligibility check use cases.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::AccessScope;
use crate::domain::{AuditType, BulkCheck};
use crate::error::UseCaseError;
use crate::ports::{AuditGateway, CheckEligibilityGateway, record_audit};

pub const DELETE_BULK_CHECK_FORBIDDEN: &str =
    "You do not have permission to delete bulk checks for this local authority";

fn bulk_check_not_found(id: Uuid) -> UseCaseError {
    UseCaseError::NotFound(format!("Bulk check {id} not found"))
}

/// Lists bulk checks owned by the caller's local authorities.
pub struct GetBulkChecksUseCase {
    checks: Arc<dyn CheckEligibilityGateway>,
}

impl GetBulkChecksUseCase {
    pub fn new(checks: Arc<dyn CheckEligibilityGateway>) -> Self {
        Self { checks }
    }

    pub async fn execute(&self, access: &AccessScope) -> Result<Vec<BulkCheck>, UseCaseError> {
        let ids: Option<Vec<i32>> = access.ids().map(|ids| ids.iter().copied().collect());
        if ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let mut checks = self.checks.get_bulk_checks(ids.as_deref()).await?;
        checks.sort_by(|a, b| b.submitted.cmp(&a.submitted));
        Ok(checks)
    }
}

pub struct DeleteBulkCheckUseCase {
    checks: Arc<dyn CheckEligibilityGateway>,
    audit: Arc<dyn AuditGateway>,
}

impl DeleteBulkCheckUseCase {
    pub fn new(checks: Arc<dyn CheckEligibilityGateway>, audit: Arc<dyn AuditGateway>) -> Self {
        Self { checks, audit }
    }

    pub async fn execute(&self, id: Uuid, access: &AccessScope) -> Result<(), UseCaseError> {
        let local_authority_id = self
            .checks
            .get_local_authority_id_for_bulk_check(id)
            .await?
            .ok_or_else(|| bulk_check_not_found(id))?;

        if !access.permits(local_authority_id) {
            tracing::warn!(bulk_check_id = %id, local_authority_id, "Bulk check delete denied");
            return Err(UseCaseError::Unauthorized(
                DELETE_BULK_CHECK_FORBIDDEN.to_string(),
            ));
        }

        if !self.checks.delete_bulk_check(id).await? {
            return Err(bulk_check_not_found(id));
        }

        record_audit(self.audit.as_ref(), AuditType::BulkCheck, &id.to_string(), None).await;
        tracing::info!(bulk_check_id = %id, "Bulk check deleted");
        Ok(())
    }
}
