use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What an audit entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditType {
    Client,
    Application,
    BulkApplicationImport,
    BulkApplicationDelete,
    BulkCheck,
}

/// A recorded audit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub audit_type: AuditType,
    /// Subject of the event: a client id, application GUID, batch id...
    pub type_id: String,
    pub metadata: Option<serde_json::Value>,
    pub created: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        audit_type: AuditType,
        type_id: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            audit_type,
            type_id: type_id.into(),
            metadata,
            created: Utc::now(),
        }
    }
}
