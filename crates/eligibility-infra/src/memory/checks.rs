use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use eligibility_core::domain::{BulkCheck, BulkCheckStatus};
use eligibility_core::error::GatewayError;
use eligibility_core::ports::CheckEligibilityGateway;

/// Bulk check store. Deleting a check marks it `Deleted`; it then
/// behaves as absent.
pub struct InMemoryCheckGateway {
    store: RwLock<HashMap<Uuid, BulkCheck>>,
}

impl InMemoryCheckGateway {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, check: BulkCheck) {
        self.store.write().await.insert(check.id, check);
    }
}

impl Default for InMemoryCheckGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckEligibilityGateway for InMemoryCheckGateway {
    async fn get_local_authority_id_for_bulk_check(
        &self,
        id: Uuid,
    ) -> Result<Option<i32>, GatewayError> {
        Ok(self
            .store
            .read()
            .await
            .get(&id)
            .filter(|c| c.status != BulkCheckStatus::Deleted)
            .map(|c| c.local_authority_id))
    }

    async fn get_bulk_checks(
        &self,
        local_authority_ids: Option<&[i32]>,
    ) -> Result<Vec<BulkCheck>, GatewayError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|c| c.status != BulkCheckStatus::Deleted)
            .filter(|c| local_authority_ids.is_none_or(|ids| ids.contains(&c.local_authority_id)))
            .cloned()
            .collect())
    }

    async fn delete_bulk_check(&self, id: Uuid) -> Result<bool, GatewayError> {
        let mut store = self.store.write().await;
        match store.get_mut(&id) {
            Some(check) if check.status != BulkCheckStatus::Deleted => {
                check.status = BulkCheckStatus::Deleted;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
