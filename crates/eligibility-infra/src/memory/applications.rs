use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use eligibility_core::domain::{Application, ApplicationPage, ApplicationQuery, ApplicationStatus};
use eligibility_core::error::GatewayError;
use eligibility_core::ports::{ApplicationGateway, EstablishmentGateway};

use super::InMemoryEstablishmentGateway;

/// Application store backed by a `HashMap` behind an async `RwLock`.
///
/// Bulk writes hold the write lock for the whole batch, so a batch is
/// applied completely or not at all.
pub struct InMemoryApplicationGateway {
    store: RwLock<HashMap<Uuid, Application>>,
    establishments: Arc<InMemoryEstablishmentGateway>,
}

impl InMemoryApplicationGateway {
    pub fn new(establishments: Arc<InMemoryEstablishmentGateway>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            establishments,
        }
    }

    fn matches_keyword(application: &Application, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        [
            Some(application.reference.as_str()),
            Some(application.parent_first_name.as_str()),
            Some(application.parent_last_name.as_str()),
            Some(application.parent_email.as_str()),
            application.parent_national_insurance_number.as_deref(),
            Some(application.child_first_name.as_str()),
            Some(application.child_last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&keyword))
    }
}

#[async_trait]
impl ApplicationGateway for InMemoryApplicationGateway {
    async fn get_local_authority_id_for_application(
        &self,
        id: Uuid,
    ) -> Result<Option<i32>, GatewayError> {
        Ok(self
            .store
            .read()
            .await
            .get(&id)
            .map(|a| a.local_authority_id))
    }

    async fn get_local_authority_ids_for_applications(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i32>, GatewayError> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| store.get(id).map(|a| (*id, a.local_authority_id)))
            .collect())
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, GatewayError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn post_application(
        &self,
        application: Application,
    ) -> Result<Application, GatewayError> {
        let mut store = self.store.write().await;
        if store.contains_key(&application.id) {
            return Err(GatewayError::Constraint(format!(
                "application {} already exists",
                application.id
            )));
        }
        store.insert(application.id, application.clone());
        Ok(application)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, GatewayError> {
        let mut store = self.store.write().await;
        Ok(store.get_mut(&id).map(|application| {
            application.status = status;
            application.updated = Utc::now();
            application.clone()
        }))
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, GatewayError> {
        Ok(self.store.write().await.remove(&id).is_some())
    }

    async fn search_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<ApplicationPage, GatewayError> {
        // Resolve the trust filter to URNs before taking the store lock.
        let trust_urns: Option<Vec<i32>> = match query.multi_academy_trust_id {
            Some(trust) => {
                let store = self.store.read().await;
                let mut urns: Vec<i32> = store.values().map(|a| a.establishment_urn).collect();
                drop(store);
                urns.sort_unstable();
                urns.dedup();

                let establishments = self.establishments.get_establishments_by_urns(&urns).await?;
                Some(
                    establishments
                        .into_iter()
                        .filter(|e| e.multi_academy_trust_id == Some(trust))
                        .map(|e| e.urn)
                        .collect(),
                )
            }
            None => None,
        };

        let store = self.store.read().await;
        let mut matched: Vec<&Application> = store
            .values()
            .filter(|a| {
                query
                    .local_authority_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&a.local_authority_id))
            })
            .filter(|a| query.establishment_urn.is_none_or(|urn| a.establishment_urn == urn))
            .filter(|a| {
                trust_urns
                    .as_ref()
                    .is_none_or(|urns| urns.contains(&a.establishment_urn))
            })
            .filter(|a| query.statuses.is_empty() || query.statuses.contains(&a.status))
            .filter(|a| {
                query
                    .keyword
                    .as_deref()
                    .is_none_or(|k| Self::matches_keyword(a, k))
            })
            .filter(|a| query.date_from.is_none_or(|from| a.created.date_naive() >= from))
            .filter(|a| query.date_to.is_none_or(|to| a.created.date_naive() <= to))
            .collect();

        matched.sort_by(|a, b| b.created.cmp(&a.created));

        let total = matched.len() as u64;
        let skip = (query.page.saturating_sub(1) as usize).saturating_mul(query.page_size as usize);
        let data = matched
            .into_iter()
            .skip(skip)
            .take(query.page_size as usize)
            .cloned()
            .collect();

        Ok(ApplicationPage::new(data, total, query.page_size))
    }

    async fn bulk_import_applications(
        &self,
        applications: Vec<Application>,
    ) -> Result<(), GatewayError> {
        let mut store = self.store.write().await;
        if let Some(duplicate) = applications.iter().find(|a| store.contains_key(&a.id)) {
            return Err(GatewayError::Constraint(format!(
                "application {} already exists",
                duplicate.id
            )));
        }

        let count = applications.len();
        store.extend(applications.into_iter().map(|a| (a.id, a)));
        tracing::debug!(count, "Applications imported");
        Ok(())
    }

    async fn bulk_delete_applications(&self, ids: &[Uuid]) -> Result<usize, GatewayError> {
        let mut store = self.store.write().await;
        let removed = ids.iter().filter(|id| store.remove(id).is_some()).count();
        tracing::debug!(removed, "Applications deleted");
        Ok(removed)
    }
}
