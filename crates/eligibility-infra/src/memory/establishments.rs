use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use eligibility_core::domain::Establishment;
use eligibility_core::error::GatewayError;
use eligibility_core::ports::EstablishmentGateway;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Establishment directory keyed by URN.
pub struct InMemoryEstablishmentGateway {
    store: RwLock<HashMap<i32, Establishment>>,
}

impl InMemoryEstablishmentGateway {
    pub fn new(establishments: Vec<Establishment>) -> Self {
        Self {
            store: RwLock::new(establishments.into_iter().map(|e| (e.urn, e)).collect()),
        }
    }

    /// Load a JSON array of establishments.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;
        let establishments: Vec<Establishment> =
            serde_json::from_slice(&raw).map_err(|source| LoadError::Parse {
                path: display.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), count = establishments.len(), "Establishments loaded");
        Ok(Self::new(establishments))
    }

    pub async fn insert(&self, establishment: Establishment) {
        self.store
            .write()
            .await
            .insert(establishment.urn, establishment);
    }
}

impl Default for InMemoryEstablishmentGateway {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl EstablishmentGateway for InMemoryEstablishmentGateway {
    async fn get_establishment(&self, urn: i32) -> Result<Option<Establishment>, GatewayError> {
        Ok(self.store.read().await.get(&urn).cloned())
    }

    async fn get_establishments_by_urns(
        &self,
        urns: &[i32],
    ) -> Result<Vec<Establishment>, GatewayError> {
        let store = self.store.read().await;
        let mut found: Vec<Establishment> =
            urns.iter().filter_map(|urn| store.get(urn).cloned()).collect();
        found.sort_by_key(|e| e.urn);
        found.dedup_by_key(|e| e.urn);
        Ok(found)
    }

    async fn get_multi_academy_trust_id_for_establishment(
        &self,
        urn: i32,
    ) -> Result<Option<i32>, GatewayError> {
        Ok(self
            .store
            .read()
            .await
            .get(&urn)
            .and_then(|e| e.multi_academy_trust_id))
    }
}
