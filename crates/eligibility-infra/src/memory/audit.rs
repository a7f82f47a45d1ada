use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use eligibility_core::domain::{AuditEntry, AuditType};
use eligibility_core::error::GatewayError;
use eligibility_core::ports::AuditGateway;

/// Append-only audit log.
#[derive(Default)]
pub struct InMemoryAuditGateway {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditGateway for InMemoryAuditGateway {
    async fn create_audit_entry(
        &self,
        audit_type: AuditType,
        type_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Uuid, GatewayError> {
        let entry = AuditEntry::new(audit_type, type_id, metadata);
        let id = entry.id;
        tracing::debug!(audit_id = %id, ?audit_type, type_id, "Audit entry recorded");
        self.entries.write().await.push(entry);
        Ok(id)
    }
}
