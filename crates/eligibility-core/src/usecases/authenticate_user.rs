//! OAuth2 client-credentials token exchange.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::AuditType;
use crate::error::UseCaseError;
use crate::ports::{
    AuditGateway, AuthError, ClientRegistry, SecretVerifier, TokenService, record_audit,
};
use crate::scope::{DEFAULT_SCOPE, validate_scopes};

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

pub const CREDENTIALS_REQUIRED: &str = "client_id and client_secret are required";
pub const UNSUPPORTED_GRANT: &str = "Unsupported grant_type. Only client_credentials is supported";
pub const INVALID_CLIENT: &str = "Invalid client credentials";
pub const INVALID_SCOPE: &str = "Invalid scope requested";
pub const TOKEN_SERVICE_MISCONFIGURED: &str = "Token signing is not configured";
pub const CLIENT_MISCONFIGURED: &str = "Client secret configuration is invalid";
pub const TOKEN_ISSUE_FAILED: &str = "Access token could not be issued";

/// Credentials presented to the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemUser {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub scope: Option<String>,
    pub grant_type: Option<String>,
}

/// A granted access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: i64,
    pub scope: String,
}

pub struct AuthenticateUserUseCase {
    clients: Arc<dyn ClientRegistry>,
    secrets: Arc<dyn SecretVerifier>,
    tokens: Arc<dyn TokenService>,
    audit: Arc<dyn AuditGateway>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AuthenticateUserUseCase {
    pub fn new(
        clients: Arc<dyn ClientRegistry>,
        secrets: Arc<dyn SecretVerifier>,
        tokens: Arc<dyn TokenService>,
        audit: Arc<dyn AuditGateway>,
    ) -> Self {
        Self {
            clients,
            secrets,
            tokens,
            audit,
        }
    }

    pub async fn execute(&self, user: SystemUser) -> Result<AccessToken, UseCaseError> {
        let (Some(client_id), Some(client_secret)) =
            (non_blank(&user.client_id), non_blank(&user.client_secret))
        else {
            return Err(UseCaseError::InvalidRequest(CREDENTIALS_REQUIRED.to_string()));
        };

        if let Some(grant_type) = non_blank(&user.grant_type) {
            if grant_type != CLIENT_CREDENTIALS_GRANT {
                return Err(UseCaseError::InvalidRequest(UNSUPPORTED_GRANT.to_string()));
            }
        }

        let Some(client) = self.clients.find_client(client_id).await else {
            tracing::warn!(client_id, "Token requested for unknown client");
            return Err(UseCaseError::InvalidClient(INVALID_CLIENT.to_string()));
        };

        let verified = self
            .secrets
            .verify(client_secret, &client.secret)
            .map_err(|e| {
                tracing::error!(client_id, error = %e, "Configured client secret is unusable");
                UseCaseError::ServerError(CLIENT_MISCONFIGURED.to_string())
            })?;
        if !verified {
            tracing::warn!(client_id, "Client secret mismatch");
            return Err(UseCaseError::InvalidClient(INVALID_CLIENT.to_string()));
        }

        let requested = non_blank(&user.scope).unwrap_or_default();
        if !validate_scopes(requested, &client.scope) {
            tracing::warn!(client_id, requested, "Requested scope not permitted");
            return Err(UseCaseError::InvalidScope(INVALID_SCOPE.to_string()));
        }

        let granted = if requested.is_empty() || requested == DEFAULT_SCOPE {
            client.scope.trim().to_string()
        } else {
            requested.to_string()
        };

        let issued = self
            .tokens
            .issue_token(client_id, &granted)
            .map_err(|e| match e {
                AuthError::Misconfigured(detail) => {
                    tracing::error!(%detail, "Token service misconfigured");
                    UseCaseError::ServerError(TOKEN_SERVICE_MISCONFIGURED.to_string())
                }
                other => {
                    tracing::error!(error = %other, "Token issue failed");
                    UseCaseError::ServerError(TOKEN_ISSUE_FAILED.to_string())
                }
            })?;

        record_audit(self.audit.as_ref(), AuditType::Client, client_id, None).await;
        tracing::info!(client_id, scope = %granted, "Access token issued");

        Ok(AccessToken {
            access_token: issued.access_token,
            expires_in: issued.expires_in,
            scope: granted,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ports::{ClientCredentials, IssuedToken, TOKEN_LIFETIME_MINUTES, TokenClaims};
    use crate::usecases::test_support::FakeAudit;

    struct Clients(Vec<ClientCredentials>);

    #[async_trait]
    impl ClientRegistry for Clients {
        async fn find_client(&self, client_id: &str) -> Option<ClientCredentials> {
            self.0.iter().find(|c| c.client_id == client_id).cloned()
        }
    }

    struct PlainSecrets;

    impl SecretVerifier for PlainSecrets {
        fn verify(&self, presented: &str, stored: &str) -> Result<bool, AuthError> {
            if stored == "corrupt" {
                return Err(AuthError::HashingError("bad hash".to_string()));
            }
            Ok(presented == stored)
        }
    }

    #[derive(Clone, Copy)]
    enum Tokens {
        Working,
        Unconfigured,
        Broken,
    }

    impl TokenService for Tokens {
        fn issue_token(&self, subject: &str, scope: &str) -> Result<IssuedToken, AuthError> {
            match self {
                Tokens::Unconfigured => {
                    return Err(AuthError::Misconfigured("JWT_SECRET is not set".to_string()));
                }
                Tokens::Broken => {
                    return Err(AuthError::InvalidToken("key rejected by encoder".to_string()));
                }
                Tokens::Working => {}
            }
            Ok(IssuedToken {
                access_token: format!("{subject}|{scope}"),
                expires_in: TOKEN_LIFETIME_MINUTES * 60,
            })
        }

        fn validate_token(&self, _token: &str) -> Result<TokenClaims, AuthError> {
            Err(AuthError::InvalidToken("not used".to_string()))
        }
    }

    fn use_case(tokens: Tokens, audit: Arc<FakeAudit>) -> AuthenticateUserUseCase {
        AuthenticateUserUseCase::new(
            Arc::new(Clients(vec![
                ClientCredentials {
                    client_id: "la-portal".to_string(),
                    secret: "s3cret".to_string(),
                    scope: "application local_authority:894 check".to_string(),
                },
                ClientCredentials {
                    client_id: "broken".to_string(),
                    secret: "corrupt".to_string(),
                    scope: "check".to_string(),
                },
            ])),
            Arc::new(PlainSecrets),
            Arc::new(tokens),
            audit,
        )
    }

    fn user(id: &str, secret: &str, scope: Option<&str>) -> SystemUser {
        SystemUser {
            client_id: Some(id.to_string()),
            client_secret: Some(secret.to_string()),
            scope: scope.map(str::to_string),
            grant_type: Some(CLIENT_CREDENTIALS_GRANT.to_string()),
        }
    }

    #[tokio::test]
    async fn test_issues_token_with_requested_scope() {
        let audit = Arc::new(FakeAudit::default());
        let token = use_case(Tokens::Working, audit.clone())
            .execute(user("la-portal", "s3cret", Some("application local_authority:894")))
            .await
            .unwrap();

        assert_eq!(token.scope, "application local_authority:894");
        assert_eq!(token.expires_in, 7200);
        assert_eq!(token.access_token, "la-portal|application local_authority:894");
        assert_eq!(audit.types(), vec![AuditType::Client]);
    }

    #[tokio::test]
    async fn test_default_scope_grants_configured_scope() {
        let token = use_case(Tokens::Working, Arc::new(FakeAudit::default()))
            .execute(user("la-portal", "s3cret", Some("default")))
            .await
            .unwrap();
        assert_eq!(token.scope, "application local_authority:894 check");
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let err = use_case(Tokens::Working, Arc::new(FakeAudit::default()))
            .execute(SystemUser::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::InvalidRequest(msg) if msg == CREDENTIALS_REQUIRED));
    }

    #[tokio::test]
    async fn test_unsupported_grant_type() {
        let mut request = user("la-portal", "s3cret", None);
        request.grant_type = Some("password".to_string());
        let err = use_case(Tokens::Working, Arc::new(FakeAudit::default()))
            .execute(request)
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::InvalidRequest(msg) if msg == UNSUPPORTED_GRANT));
    }

    #[tokio::test]
    async fn test_bad_credentials_are_invalid_client() {
        let audit = Arc::new(FakeAudit::default());
        let uc = use_case(Tokens::Working, audit.clone());

        let err = uc.execute(user("la-portal", "wrong", None)).await.unwrap_err();
        assert!(matches!(err, UseCaseError::InvalidClient(_)));

        let err = uc.execute(user("nobody", "s3cret", None)).await.unwrap_err();
        assert!(matches!(err, UseCaseError::InvalidClient(_)));
        assert_eq!(audit.count(), 0);
    }

    #[tokio::test]
    async fn test_scope_outside_grant() {
        let err = use_case(Tokens::Working, Arc::new(FakeAudit::default()))
            .execute(user("la-portal", "s3cret", Some("local_authority:201")))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::InvalidScope(msg) if msg == INVALID_SCOPE));
    }

    #[tokio::test]
    async fn test_missing_signing_configuration_is_server_error() {
        let err = use_case(Tokens::Unconfigured, Arc::new(FakeAudit::default()))
            .execute(user("la-portal", "s3cret", None))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::ServerError(msg) if msg == TOKEN_SERVICE_MISCONFIGURED));
    }

    #[tokio::test]
    async fn test_unusable_stored_secret_is_server_error() {
        let err = use_case(Tokens::Working, Arc::new(FakeAudit::default()))
            .execute(user("broken", "anything", None))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::ServerError(msg) if msg == CLIENT_MISCONFIGURED));
    }

    #[tokio::test]
    async fn test_token_failure_detail_is_not_returned() {
        let audit = Arc::new(FakeAudit::default());
        let err = use_case(Tokens::Broken, audit.clone())
            .execute(user("la-portal", "s3cret", None))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::ServerError(msg) if msg == TOKEN_ISSUE_FAILED));
        assert_eq!(audit.count(), 0);
    }
}
