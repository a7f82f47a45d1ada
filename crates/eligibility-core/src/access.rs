//! Caller access model derived from granted scopes.

use std::collections::BTreeSet;

use crate::scope::{LOCAL_AUTHORITY, MULTI_ACADEMY_TRUST, ScopeSet};

/// Legacy id meaning "every organisation" in claim id lists.
pub const ALL_ORGANISATIONS_ID: i32 = 0;

/// Which organisations a caller may act on within one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    Unrestricted,
    RestrictedTo(BTreeSet<i32>),
}

impl AccessScope {
    /// Build from a raw id list where `0` grants everything.
    pub fn from_ids(ids: &[i32]) -> Self {
        if ids.contains(&ALL_ORGANISATIONS_ID) {
            Self::Unrestricted
        } else {
            Self::RestrictedTo(ids.iter().copied().collect())
        }
    }

    /// Build from granted token scopes for one namespace.
    ///
    /// The bare namespace, or an explicit `namespace:0`, is unrestricted.
    /// Ids that are not integers are ignored.
    pub fn from_scopes(scopes: &ScopeSet, namespace: &str) -> Self {
        if scopes.has(namespace) {
            return Self::Unrestricted;
        }

        let ids: Vec<i32> = scopes
            .ids(namespace)
            .filter_map(|id| match id.parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!(namespace, id, "Ignoring non-numeric scope id");
                    None
                }
            })
            .collect();

        Self::from_ids(&ids)
    }

    pub fn none() -> Self {
        Self::RestrictedTo(BTreeSet::new())
    }

    pub fn permits(&self, id: i32) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::RestrictedTo(ids) => ids.contains(&id),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Permitted ids, or `None` when unrestricted.
    pub fn ids(&self) -> Option<&BTreeSet<i32>> {
        match self {
            Self::Unrestricted => None,
            Self::RestrictedTo(ids) => Some(ids),
        }
    }
}

/// Everything a caller is allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerAccess {
    pub local_authorities: AccessScope,
    pub multi_academy_trusts: AccessScope,
}

impl CallerAccess {
    pub fn from_scopes(scopes: &ScopeSet) -> Self {
        Self {
            local_authorities: AccessScope::from_scopes(scopes, LOCAL_AUTHORITY),
            multi_academy_trusts: AccessScope::from_scopes(scopes, MULTI_ACADEMY_TRUST),
        }
    }

    pub fn unrestricted() -> Self {
        Self {
            local_authorities: AccessScope::Unrestricted,
            multi_academy_trusts: AccessScope::Unrestricted,
        }
    }

    /// Access limited to the given local authorities and no trusts.
    pub fn local_authorities(ids: &[i32]) -> Self {
        Self {
            local_authorities: AccessScope::from_ids(ids),
            multi_academy_trusts: AccessScope::none(),
        }
    }

    /// Unrestricted local authority access covers every trust.
    pub fn permits_trust(&self, trust: i32) -> bool {
        self.local_authorities.is_unrestricted() || self.multi_academy_trusts.permits(trust)
    }

    /// Whether the caller may act on an establishment through either owner.
    pub fn permits_establishment(&self, local_authority_id: i32, trust: Option<i32>) -> bool {
        self.local_authorities.permits(local_authority_id)
            || trust.is_some_and(|trust| self.multi_academy_trusts.permits(trust))
    }

    /// Whether any trust grant exists at all.
    pub fn has_trust_access(&self) -> bool {
        self.multi_academy_trusts
            .ids()
            .is_none_or(|ids| !ids.is_empty())
    }
}
