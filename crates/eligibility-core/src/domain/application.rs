use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a free school meals application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Entitled,
    Receiving,
    EvidenceNeeded,
    SentForReview,
    ReviewedEntitled,
    ReviewedNotEntitled,
    Archived,
}

/// Application details supplied by a caller, before it is placed with a
/// local authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub establishment_urn: i32,
    pub parent_first_name: String,
    pub parent_last_name: String,
    pub parent_date_of_birth: NaiveDate,
    pub parent_national_insurance_number: Option<String>,
    pub parent_email: String,
    pub child_first_name: String,
    pub child_last_name: String,
    pub child_date_of_birth: NaiveDate,
}

/// Application entity - a parent's claim on behalf of one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub reference: String,
    pub local_authority_id: i32,
    pub establishment_urn: i32,
    pub parent_first_name: String,
    pub parent_last_name: String,
    pub parent_date_of_birth: NaiveDate,
    pub parent_national_insurance_number: Option<String>,
    pub parent_email: String,
    pub child_first_name: String,
    pub child_last_name: String,
    pub child_date_of_birth: NaiveDate,
    pub status: ApplicationStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Application {
    /// Create an application owned by `local_authority_id`. Imported and
    /// newly created applications start out `Entitled`.
    pub fn new(details: NewApplication, local_authority_id: i32) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Self {
            id,
            reference: reference_for(id),
            local_authority_id,
            establishment_urn: details.establishment_urn,
            parent_first_name: details.parent_first_name,
            parent_last_name: details.parent_last_name,
            parent_date_of_birth: details.parent_date_of_birth,
            parent_national_insurance_number: details.parent_national_insurance_number,
            parent_email: details.parent_email,
            child_first_name: details.child_first_name,
            child_last_name: details.child_last_name,
            child_date_of_birth: details.child_date_of_birth,
            status: ApplicationStatus::Entitled,
            created: now,
            updated: now,
        }
    }
}

// 8-digit reference shown to parents and school staff.
fn reference_for(id: Uuid) -> String {
    format!("{:08}", id.as_u128() % 100_000_000)
}

/// Search criteria for applications.
///
/// `local_authority_ids` of `None` means "no local authority restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub local_authority_ids: Option<Vec<i32>>,
    pub multi_academy_trust_id: Option<i32>,
    pub establishment_urn: Option<i32>,
    pub statuses: Vec<ApplicationStatus>,
    pub keyword: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: u32,
    pub page_size: u32,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPage {
    pub data: Vec<Application>,
    pub total_records: u64,
    pub total_pages: u32,
}

impl ApplicationPage {
    pub fn new(data: Vec<Application>, total_records: u64, page_size: u32) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_records.div_ceil(u64::from(page_size)) as u32
        };
        Self {
            data,
            total_records,
            total_pages,
        }
    }
}
