//! Realm Routing
//!
//! Prefixes admin paths with the configured realm.

/// Maps realm-relative paths onto the admin API.
#[derive(Clone, Debug)]
pub struct RealmScopedRouter {
    realm: String,
}

impl RealmScopedRouter {
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
        }
    }

    /// Realm every routed path is scoped to.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// `{realm}/{path}`, or just `{realm}` for an empty path.
    pub fn route(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.realm.clone()
        } else {
            format!("{}/{}", self.realm, path)
        }
    }
}
