//! In-memory fakes for use case tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationPage, ApplicationQuery, ApplicationStatus, AuditEntry, AuditType,
    BulkCheck, BulkCheckStatus, Establishment, NewApplication,
};
use crate::error::GatewayError;
use crate::ports::{
    ApplicationGateway, AuditGateway, CheckEligibilityGateway, EstablishmentGateway,
};

pub fn establishment(urn: i32, local_authority_id: i32, mat: Option<i32>) -> Establishment {
    Establishment {
        urn,
        name: format!("School {urn}"),
        local_authority_id,
        multi_academy_trust_id: mat,
    }
}

pub fn application(local_authority_id: i32, urn: i32) -> Application {
    Application::new(
        NewApplication {
            establishment_urn: urn,
            parent_first_name: "Sam".to_string(),
            parent_last_name: "Jones".to_string(),
            parent_date_of_birth: chrono::NaiveDate::from_ymd_opt(1985, 3, 1).unwrap(),
            parent_national_insurance_number: None,
            parent_email: "sam@example.com".to_string(),
            child_first_name: "Alex".to_string(),
            child_last_name: "Jones".to_string(),
            child_date_of_birth: chrono::NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
        },
        local_authority_id,
    )
}

fn failure() -> GatewayError {
    GatewayError::Connection("database unavailable".to_string())
}

#[derive(Default)]
pub struct FakeApplications {
    pub stored: Mutex<HashMap<Uuid, Application>>,
    pub fail_lookup: AtomicBool,
    pub fail_writes: AtomicBool,
    pub bulk_import_calls: AtomicUsize,
    pub bulk_delete_calls: AtomicUsize,
    pub last_query: Mutex<Option<ApplicationQuery>>,
}

impl FakeApplications {
    pub fn with(applications: Vec<Application>) -> Self {
        let fake = Self::default();
        {
            let mut stored = fake.stored.lock().unwrap();
            for app in applications {
                stored.insert(app.id, app);
            }
        }
        fake
    }

    pub fn count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }
}

#[async_trait]
impl ApplicationGateway for FakeApplications {
    async fn get_local_authority_id_for_application(
        &self,
        id: Uuid,
    ) -> Result<Option<i32>, GatewayError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self
            .stored
            .lock()
            .unwrap()
            .get(&id)
            .map(|a| a.local_authority_id))
    }

    async fn get_local_authority_ids_for_applications(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i32>, GatewayError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(failure());
        }
        let stored = self.stored.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| stored.get(id).map(|a| (*id, a.local_authority_id)))
            .collect())
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, GatewayError> {
        Ok(self.stored.lock().unwrap().get(&id).cloned())
    }

    async fn post_application(
        &self,
        application: Application,
    ) -> Result<Application, GatewayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure());
        }
        self.stored
            .lock()
            .unwrap()
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, GatewayError> {
        let mut stored = self.stored.lock().unwrap();
        Ok(stored.get_mut(&id).map(|app| {
            app.status = status;
            app.updated = Utc::now();
            app.clone()
        }))
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, GatewayError> {
        Ok(self.stored.lock().unwrap().remove(&id).is_some())
    }

    async fn search_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<ApplicationPage, GatewayError> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        let data: Vec<Application> = self
            .stored
            .lock()
            .unwrap()
            .values()
            .filter(|a| {
                query
                    .local_authority_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&a.local_authority_id))
            })
            .cloned()
            .collect();
        let total = data.len() as u64;
        Ok(ApplicationPage::new(data, total, query.page_size))
    }

    async fn bulk_import_applications(
        &self,
        applications: Vec<Application>,
    ) -> Result<(), GatewayError> {
        self.bulk_import_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure());
        }
        let mut stored = self.stored.lock().unwrap();
        for app in applications {
            stored.insert(app.id, app);
        }
        Ok(())
    }

    async fn bulk_delete_applications(&self, ids: &[Uuid]) -> Result<usize, GatewayError> {
        self.bulk_delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure());
        }
        let mut stored = self.stored.lock().unwrap();
        Ok(ids.iter().filter(|id| stored.remove(id).is_some()).count())
    }
}

#[derive(Default)]
pub struct FakeEstablishments {
    pub establishments: Vec<Establishment>,
    pub fail: AtomicBool,
}

impl FakeEstablishments {
    pub fn with(establishments: Vec<Establishment>) -> Self {
        Self {
            establishments,
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EstablishmentGateway for FakeEstablishments {
    async fn get_establishment(&self, urn: i32) -> Result<Option<Establishment>, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self.establishments.iter().find(|e| e.urn == urn).cloned())
    }

    async fn get_establishments_by_urns(
        &self,
        urns: &[i32],
    ) -> Result<Vec<Establishment>, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self
            .establishments
            .iter()
            .filter(|e| urns.contains(&e.urn))
            .cloned()
            .collect())
    }

    async fn get_multi_academy_trust_id_for_establishment(
        &self,
        urn: i32,
    ) -> Result<Option<i32>, GatewayError> {
        Ok(self
            .establishments
            .iter()
            .find(|e| e.urn == urn)
            .and_then(|e| e.multi_academy_trust_id))
    }
}

#[derive(Default)]
pub struct FakeChecks {
    pub checks: Mutex<Vec<BulkCheck>>,
}

impl FakeChecks {
    pub fn with_check(local_authority_id: i32) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        let fake = Self::default();
        fake.checks.lock().unwrap().push(BulkCheck {
            id,
            local_authority_id,
            filename: "checks.csv".to_string(),
            status: BulkCheckStatus::Completed,
            number_of_checks: 3,
            submitted: Utc::now(),
        });
        (fake, id)
    }
}

#[async_trait]
impl CheckEligibilityGateway for FakeChecks {
    async fn get_local_authority_id_for_bulk_check(
        &self,
        id: Uuid,
    ) -> Result<Option<i32>, GatewayError> {
        Ok(self
            .checks
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.status != BulkCheckStatus::Deleted)
            .map(|c| c.local_authority_id))
    }

    async fn get_bulk_checks(
        &self,
        local_authority_ids: Option<&[i32]>,
    ) -> Result<Vec<BulkCheck>, GatewayError> {
        Ok(self
            .checks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.status != BulkCheckStatus::Deleted)
            .filter(|c| local_authority_ids.is_none_or(|ids| ids.contains(&c.local_authority_id)))
            .cloned()
            .collect())
    }

    async fn delete_bulk_check(&self, id: Uuid) -> Result<bool, GatewayError> {
        let mut checks = self.checks.lock().unwrap();
        match checks.iter_mut().find(|c| c.id == id) {
            Some(check) => {
                check.status = BulkCheckStatus::Deleted;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct FakeAudit {
    pub entries: Mutex<Vec<AuditEntry>>,
}

impl FakeAudit {
    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn types(&self) -> Vec<AuditType> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.audit_type)
            .collect()
    }
}

#[async_trait]
impl AuditGateway for FakeAudit {
    async fn create_audit_entry(
        &self,
        audit_type: AuditType,
        type_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Uuid, GatewayError> {
        let entry = AuditEntry::new(audit_type, type_id, metadata);
        let id = entry.id;
        self.entries.lock().unwrap().push(entry);
        Ok(id)
    }
}
