//! OAuth clients configured through environment variables.
//!
//! Each client is described by a pair of variables:
//!
//! ```text
//! CLIENT__LA_PORTAL__SECRET=...
//! CLIENT__LA_PORTAL__SCOPE=application local_authority:894
//! ```
//!
//! The segment between the double underscores is the client id, lowercased
//! with `_` turned into `-` (`la-portal` above).

use std::collections::HashMap;

use async_trait::async_trait;

use eligibility_core::ports::{ClientCredentials, ClientRegistry};

const PREFIX: &str = "CLIENT__";

#[derive(Default)]
struct PartialClient {
    secret: Option<String>,
    scope: Option<String>,
}

/// Client registry built once at startup.
pub struct EnvClientRegistry {
    clients: HashMap<String, ClientCredentials>,
}

impl EnvClientRegistry {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut partial: HashMap<String, PartialClient> = HashMap::new();

        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(PREFIX) else {
                continue;
            };
            let Some((raw_id, field)) = rest.rsplit_once("__") else {
                continue;
            };
            if raw_id.is_empty() {
                continue;
            }

            let client_id = raw_id.to_lowercase().replace('_', "-");
            let entry = partial.entry(client_id).or_default();
            match field {
                "SECRET" => entry.secret = Some(value),
                "SCOPE" => entry.scope = Some(value),
                other => tracing::debug!(key = %key, field = other, "Ignoring unknown client setting"),
            }
        }

        let clients: HashMap<String, ClientCredentials> = partial
            .into_iter()
            .filter_map(|(client_id, client)| {
                let Some(secret) = client.secret.filter(|s| !s.is_empty()) else {
                    tracing::warn!(client_id = %client_id, "Client has no secret configured, skipping");
                    return None;
                };
                let credentials = ClientCredentials {
                    client_id: client_id.clone(),
                    secret,
                    scope: client.scope.unwrap_or_default(),
                };
                Some((client_id, credentials))
            })
            .collect();

        tracing::info!(clients = clients.len(), "OAuth clients loaded");
        Self { clients }
    }

    pub fn with_clients(clients: Vec<ClientCredentials>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|c| (c.client_id.clone(), c))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientRegistry for EnvClientRegistry {
    async fn find_client(&self, client_id: &str) -> Option<ClientCredentials> {
        self.clients.get(client_id).cloned()
    }
}
