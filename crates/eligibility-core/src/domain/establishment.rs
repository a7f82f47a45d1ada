use serde::{Deserialize, Serialize};

/// Establishment (school), identified by its URN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    pub urn: i32,
    pub name: String,
    pub local_authority_id: i32,
    #[serde(default)]
    pub multi_academy_trust_id: Option<i32>,
}
