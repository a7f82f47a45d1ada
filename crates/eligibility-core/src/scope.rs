//! OAuth2 scope parsing and validation.
//!
//! A scope string is a whitespace-delimited list of tokens. Each token is
//! either a bare namespace (`local_authority`) or a namespace qualified with
//! an entity id (`local_authority:99`). A bare namespace in the allowed set
//! acts as a wildcard over every id in that namespace.

use std::collections::HashSet;
use std::fmt;

/// Namespace for local authority grants.
pub const LOCAL_AUTHORITY: &str = "local_authority";

/// Namespace for multi-academy trust grants.
pub const MULTI_ACADEMY_TRUST: &str = "multi_academy_trust";

/// Requested scope meaning "whatever the client is configured with".
pub const DEFAULT_SCOPE: &str = "default";

/// A single parsed scope token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeToken {
    pub namespace: String,
    pub id: Option<String>,
}

impl ScopeToken {
    /// Parse one token. `name:` with nothing after the colon is a bare name.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((namespace, id)) if !id.is_empty() => Self {
                namespace: namespace.to_string(),
                id: Some(id.to_string()),
            },
            Some((namespace, _)) => Self::bare(namespace),
            None => Self::bare(raw),
        }
    }

    pub fn bare(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: None,
        }
    }
}

impl fmt::Display for ScopeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.namespace, id),
            None => write!(f, "{}", self.namespace),
        }
    }
}

/// A set of parsed scope tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet {
    tokens: HashSet<ScopeToken>,
}

impl ScopeSet {
    pub fn parse(scope: &str) -> Self {
        Self {
            tokens: scope.split_whitespace().map(ScopeToken::parse).collect(),
        }
    }

    /// True if the bare namespace is granted.
    pub fn has(&self, namespace: &str) -> bool {
        self.tokens.contains(&ScopeToken::bare(namespace))
    }

    /// True if the requested token is covered by this set, either through
    /// the bare namespace or the exact `namespace:id` pair.
    pub fn permits(&self, requested: &ScopeToken) -> bool {
        if self.has(&requested.namespace) {
            return true;
        }
        requested.id.is_some() && self.tokens.contains(requested)
    }

    /// Ids qualified under `namespace`, in no particular order.
    pub fn ids(&self, namespace: &str) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(move |t| t.namespace == namespace)
            .filter_map(|t| t.id.as_deref())
    }
}

/// Check a requested scope string against the scopes a client is allowed.
///
/// Every requested token must be individually permitted. An empty request
/// and the literal `default` request place no restriction and are valid.
pub fn validate_scopes(requested: &str, allowed: &str) -> bool {
    let requested = requested.trim();
    if requested.is_empty() || requested == DEFAULT_SCOPE {
        return true;
    }

    let allowed = ScopeSet::parse(allowed);
    requested
        .split_whitespace()
        .map(ScopeToken::parse)
        .all(|token| allowed.permits(&token))
}
