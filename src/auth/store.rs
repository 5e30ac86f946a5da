//! Credential Store
//!
//! Named credential pairs keyed by grant type.

use std::collections::HashMap;

use crate::types::{CredentialPair, GrantType};

/// Credential pairs keyed by (case-normalized) grant type.
#[derive(Clone, Debug, Default)]
pub struct CredentialStore {
    entries: HashMap<GrantType, CredentialPair>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the pair for a grant type.
    pub fn set(&mut self, grant_type: GrantType, pair: CredentialPair) {
        self.entries.insert(grant_type, pair);
    }

    /// Remove the pair for a grant type. Removing an absent entry is a no-op.
    pub fn remove(&mut self, grant_type: &GrantType) -> Option<CredentialPair> {
        self.entries.remove(grant_type)
    }

    /// Get the pair for a grant type.
    pub fn get(&self, grant_type: &GrantType) -> Option<&CredentialPair> {
        self.entries.get(grant_type)
    }

    /// Check whether a pair is stored for a grant type.
    pub fn contains(&self, grant_type: &GrantType) -> bool {
        self.entries.contains_key(grant_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
