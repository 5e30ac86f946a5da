//! Grant Selection
//!
//! Tracks the grant type that authenticates the next admin request.

use tracing::debug;

use crate::auth::CredentialStore;
use crate::error::CredentialsError;
use crate::types::{CredentialPair, GrantType};

/// Grant type and credentials captured for one request.
#[derive(Clone, Debug)]
pub struct ActiveCredentials {
    pub grant_type: GrantType,
    pub credentials: Option<CredentialPair>,
}

/// Owns the credential store and the active grant type.
///
/// Starts with `client_credentials` active, seeded with the client's own id and secret.
/// That entry can be overwritten but never removed.
#[derive(Clone, Debug)]
pub struct GrantSelector {
    store: CredentialStore,
    active: GrantType,
}

impl GrantSelector {
    /// Create a selector seeded with the client's credentials.
    pub fn new(client_credentials: CredentialPair) -> Self {
        let mut store = CredentialStore::new();
        store.set(GrantType::ClientCredentials, client_credentials);

        Self {
            store,
            active: GrantType::ClientCredentials,
        }
    }

    /// Currently active grant type.
    pub fn active(&self) -> &GrantType {
        &self.active
    }

    /// Underlying credential store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Store or overwrite credentials without changing the active grant.
    pub fn set_credentials(&mut self, grant_type: GrantType, credentials: CredentialPair) {
        debug!(grant_type = %grant_type, "credentials stored");
        self.store.set(grant_type, credentials);
    }

    /// Remove credentials for a grant type.
    ///
    /// Fails for `client_credentials`; any other grant type, stored or not, succeeds.
    pub fn unset_credentials(&mut self, grant_type: &GrantType) -> Result<(), CredentialsError> {
        if *grant_type == GrantType::ClientCredentials {
            return Err(CredentialsError::ProtectedCredential {
                grant_type: grant_type.to_string(),
            });
        }

        if self.store.remove(grant_type).is_some() {
            debug!(grant_type = %grant_type, "credentials removed");
        }
        Ok(())
    }

    /// Make a grant type active.
    ///
    /// Supplied credentials are stored first, replacing any existing pair. Without
    /// them the store must already hold credentials for the grant type.
    pub fn activate(
        &mut self,
        grant_type: GrantType,
        credentials: Option<CredentialPair>,
    ) -> Result<&mut Self, CredentialsError> {
        match credentials {
            Some(pair) => self.store.set(grant_type.clone(), pair),
            None if !self.store.contains(&grant_type) => {
                return Err(CredentialsError::MissingCredentials {
                    grant_type: grant_type.to_string(),
                });
            }
            None => {}
        }

        debug!(grant_type = %grant_type, "grant type activated");
        self.active = grant_type;
        Ok(self)
    }

    /// Capture the active grant type together with its stored credentials.
    pub fn snapshot(&self) -> ActiveCredentials {
        ActiveCredentials {
            grant_type: self.active.clone(),
            credentials: self.store.get(&self.active).cloned(),
        }
    }
}
