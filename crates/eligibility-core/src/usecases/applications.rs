//! Single-application use cases scoped to the caller's local authorities
//! and multi-academy trusts.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::access::CallerAccess;
use crate::domain::{Application, ApplicationImportRow, ApplicationStatus, AuditType};
use crate::error::UseCaseError;
use crate::ports::{ApplicationGateway, AuditGateway, EstablishmentGateway, record_audit};

use super::validation::validate_application_row;

pub const ACCESS_FORBIDDEN: &str =
    "You do not have permission to access applications for this establishment's local authority";
pub const CREATE_FORBIDDEN: &str =
    "You do not have permission to create applications for this establishment's local authority";
pub const UPDATE_FORBIDDEN: &str =
    "You do not have permission to update applications for this establishment's local authority";
pub const DELETE_FORBIDDEN: &str =
    "You do not have permission to delete applications for this establishment's local authority";

fn application_not_found(id: Uuid) -> UseCaseError {
    UseCaseError::NotFound(format!("Application {id} not found"))
}

/// Check the caller may act on an application through its local authority,
/// or failing that through the trust owning its establishment.
async fn authorize_application(
    applications: &dyn ApplicationGateway,
    establishments: &dyn EstablishmentGateway,
    id: Uuid,
    access: &CallerAccess,
    forbidden: &str,
) -> Result<(), UseCaseError> {
    let local_authority_id = applications
        .get_local_authority_id_for_application(id)
        .await?
        .ok_or_else(|| application_not_found(id))?;

    if access.local_authorities.permits(local_authority_id) {
        return Ok(());
    }

    if access.has_trust_access() {
        let urn = applications
            .get_application(id)
            .await?
            .ok_or_else(|| application_not_found(id))?
            .establishment_urn;
        let trust = establishments
            .get_multi_academy_trust_id_for_establishment(urn)
            .await?;
        if trust.is_some_and(|trust| access.multi_academy_trusts.permits(trust)) {
            return Ok(());
        }
    }

    tracing::warn!(application_id = %id, local_authority_id, "Application access denied");
    Err(UseCaseError::Unauthorized(forbidden.to_string()))
}

pub struct GetApplicationUseCase {
    applications: Arc<dyn ApplicationGateway>,
    establishments: Arc<dyn EstablishmentGateway>,
}

impl GetApplicationUseCase {
    pub fn new(
        applications: Arc<dyn ApplicationGateway>,
        establishments: Arc<dyn EstablishmentGateway>,
    ) -> Self {
        Self {
            applications,
            establishments,
        }
    }

    pub async fn execute(
        &self,
        id: Uuid,
        access: &CallerAccess,
    ) -> Result<Application, UseCaseError> {
        authorize_application(
            self.applications.as_ref(),
            self.establishments.as_ref(),
            id,
            access,
            ACCESS_FORBIDDEN,
        )
        .await?;

        self.applications
            .get_application(id)
            .await?
            .ok_or_else(|| application_not_found(id))
    }
}

pub struct CreateApplicationUseCase {
    applications: Arc<dyn ApplicationGateway>,
    establishments: Arc<dyn EstablishmentGateway>,
    audit: Arc<dyn AuditGateway>,
}

impl CreateApplicationUseCase {
    pub fn new(
        applications: Arc<dyn ApplicationGateway>,
        establishments: Arc<dyn EstablishmentGateway>,
        audit: Arc<dyn AuditGateway>,
    ) -> Self {
        Self {
            applications,
            establishments,
            audit,
        }
    }

    pub async fn execute(
        &self,
        request: ApplicationImportRow,
        access: &CallerAccess,
    ) -> Result<Application, UseCaseError> {
        let details = validate_application_row(&request)
            .map_err(|errors| UseCaseError::Validation(errors.join(", ")))?;

        let establishment = self
            .establishments
            .get_establishment(details.establishment_urn)
            .await?
            .ok_or_else(|| {
                UseCaseError::NotFound(format!(
                    "Establishment with URN {} not found",
                    details.establishment_urn
                ))
            })?;

        if !access.permits_establishment(
            establishment.local_authority_id,
            establishment.multi_academy_trust_id,
        ) {
            return Err(UseCaseError::Unauthorized(CREATE_FORBIDDEN.to_string()));
        }

        let application = self
            .applications
            .post_application(Application::new(details, establishment.local_authority_id))
            .await?;

        record_audit(
            self.audit.as_ref(),
            AuditType::Application,
            &application.id.to_string(),
            Some(json!({ "action": "create" })),
        )
        .await;

        tracing::info!(application_id = %application.id, "Application created");
        Ok(application)
    }
}

pub struct UpdateApplicationStatusUseCase {
    applications: Arc<dyn ApplicationGateway>,
    establishments: Arc<dyn EstablishmentGateway>,
    audit: Arc<dyn AuditGateway>,
}

impl UpdateApplicationStatusUseCase {
    pub fn new(
        applications: Arc<dyn ApplicationGateway>,
        establishments: Arc<dyn EstablishmentGateway>,
        audit: Arc<dyn AuditGateway>,
    ) -> Self {
        Self {
            applications,
            establishments,
            audit,
        }
    }

    pub async fn execute(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        access: &CallerAccess,
    ) -> Result<Application, UseCaseError> {
        authorize_application(
            self.applications.as_ref(),
            self.establishments.as_ref(),
            id,
            access,
            UPDATE_FORBIDDEN,
        )
        .await?;

        let application = self
            .applications
            .update_application_status(id, status)
            .await?
            .ok_or_else(|| application_not_found(id))?;

        record_audit(
            self.audit.as_ref(),
            AuditType::Application,
            &id.to_string(),
            Some(json!({ "action": "update", "status": status })),
        )
        .await;

        Ok(application)
    }
}

pub struct DeleteApplicationUseCase {
    applications: Arc<dyn ApplicationGateway>,
    establishments: Arc<dyn EstablishmentGateway>,
    audit: Arc<dyn AuditGateway>,
}

impl DeleteApplicationUseCase {
    pub fn new(
        applications: Arc<dyn ApplicationGateway>,
        establishments: Arc<dyn EstablishmentGateway>,
        audit: Arc<dyn AuditGateway>,
    ) -> Self {
        Self {
            applications,
            establishments,
            audit,
        }
    }

    pub async fn execute(&self, id: Uuid, access: &CallerAccess) -> Result<(), UseCaseError> {
        authorize_application(
            self.applications.as_ref(),
            self.establishments.as_ref(),
            id,
            access,
            DELETE_FORBIDDEN,
        )
        .await?;

        if !self.applications.delete_application(id).await? {
            return Err(application_not_found(id));
        }

        record_audit(
            self.audit.as_ref(),
            AuditType::Application,
            &id.to_string(),
            Some(json!({ "action": "delete" })),
        )
        .await;

        tracing::info!(application_id = %id, "Application deleted");
        Ok(())
    }
}
