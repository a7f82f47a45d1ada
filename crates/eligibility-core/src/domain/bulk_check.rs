use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkCheckStatus {
    InProgress,
    Completed,
    Deleted,
}

/// A batch of eligibility checks submitted together under one GUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheck {
    pub id: Uuid,
    pub local_authority_id: i32,
    pub filename: String,
    pub status: BulkCheckStatus,
    pub number_of_checks: u32,
    pub submitted: DateTime<Utc>,
}
