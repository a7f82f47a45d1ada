//! Application state - shared across all handlers.

use std::sync::Arc;

use eligibility_core::ports::{
    ApplicationGateway, AuditGateway, CheckEligibilityGateway, ClientRegistry,
    EstablishmentGateway, SecretVerifier, TokenService,
};
use eligibility_core::usecases::{
    AuthenticateUserUseCase, CreateApplicationUseCase, DeleteApplicationUseCase,
    DeleteApplicationsUseCase, DeleteBulkCheckUseCase, GetApplicationUseCase,
    GetBulkChecksUseCase, ImportApplicationsUseCase, SearchApplicationsUseCase,
    UpdateApplicationStatusUseCase,
};
use eligibility_infra::{
    Argon2SecretVerifier, EnvClientRegistry, InMemoryApplicationGateway, InMemoryAuditGateway,
    InMemoryCheckGateway, InMemoryEstablishmentGateway, JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state. Use cases are built per request from these
/// handles.
#[derive(Clone)]
pub struct AppState {
    pub applications: Arc<dyn ApplicationGateway>,
    pub establishments: Arc<dyn EstablishmentGateway>,
    pub checks: Arc<dyn CheckEligibilityGateway>,
    pub audit: Arc<dyn AuditGateway>,
    pub clients: Arc<dyn ClientRegistry>,
    pub secrets: Arc<dyn SecretVerifier>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state from configuration and the environment.
    pub async fn new(config: &AppConfig) -> Self {
        let establishments = match &config.establishments_file {
            Some(path) => match InMemoryEstablishmentGateway::from_json_file(path).await {
                Ok(gateway) => gateway,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load establishments. Starting with none.");
                    InMemoryEstablishmentGateway::default()
                }
            },
            None => {
                tracing::warn!("ESTABLISHMENTS_FILE not set. Starting with no establishments.");
                InMemoryEstablishmentGateway::default()
            }
        };
        let establishments = Arc::new(establishments);

        let state = Self {
            applications: Arc::new(InMemoryApplicationGateway::new(establishments.clone())),
            establishments,
            checks: Arc::new(InMemoryCheckGateway::new()),
            audit: Arc::new(InMemoryAuditGateway::new()),
            clients: Arc::new(EnvClientRegistry::from_env()),
            secrets: Arc::new(Argon2SecretVerifier::new()),
            tokens: Arc::new(JwtTokenService::from_env()),
        };

        tracing::info!("Application state initialized");
        state
    }

    pub fn authenticate_user(&self) -> AuthenticateUserUseCase {
        AuthenticateUserUseCase::new(
            self.clients.clone(),
            self.secrets.clone(),
            self.tokens.clone(),
            self.audit.clone(),
        )
    }

    pub fn get_application(&self) -> GetApplicationUseCase {
        GetApplicationUseCase::new(self.applications.clone(), self.establishments.clone())
    }

    pub fn create_application(&self) -> CreateApplicationUseCase {
        CreateApplicationUseCase::new(
            self.applications.clone(),
            self.establishments.clone(),
            self.audit.clone(),
        )
    }

    pub fn update_application_status(&self) -> UpdateApplicationStatusUseCase {
        UpdateApplicationStatusUseCase::new(
            self.applications.clone(),
            self.establishments.clone(),
            self.audit.clone(),
        )
    }

    pub fn delete_application(&self) -> DeleteApplicationUseCase {
        DeleteApplicationUseCase::new(
            self.applications.clone(),
            self.establishments.clone(),
            self.audit.clone(),
        )
    }

    pub fn search_applications(&self) -> SearchApplicationsUseCase {
        SearchApplicationsUseCase::new(self.applications.clone(), self.establishments.clone())
    }

    pub fn import_applications(&self) -> ImportApplicationsUseCase {
        ImportApplicationsUseCase::new(
            self.applications.clone(),
            self.establishments.clone(),
            self.audit.clone(),
        )
    }

    pub fn delete_applications(&self) -> DeleteApplicationsUseCase {
        DeleteApplicationsUseCase::new(self.applications.clone(), self.audit.clone())
    }

    pub fn get_bulk_checks(&self) -> GetBulkChecksUseCase {
        GetBulkChecksUseCase::new(self.checks.clone())
    }

    pub fn delete_bulk_check(&self) -> DeleteBulkCheckUseCase {
        DeleteBulkCheckUseCase::new(self.checks.clone(), self.audit.clone())
    }
}
