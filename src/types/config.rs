//! Configuration Types
//!
//! Keycloak client configuration and endpoint derivation.

use secrecy::SecretString;
use std::time::Duration;

use crate::builders::KeycloakConfigBuilder;
use crate::error::{ConfigurationError, KeycloakResult};

/// Default relative path Keycloak is served under (pre-17 layout).
pub const DEFAULT_BASE_PATH: &str = "/auth";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Keycloak client configuration.
#[derive(Clone)]
pub struct KeycloakConfig {
    /// Client identifier used for the `client_credentials` grant.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// Realm admin requests are scoped to.
    pub realm: String,
    /// Server URL, e.g. `https://sso.example.com`.
    pub url: String,
    /// Realm to authenticate against, when different from `realm`.
    pub auth_realm: Option<String>,
    /// Relative path of the server (`--http-relative-path`); `""` or `"/"` for none.
    pub base_path: String,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl KeycloakConfig {
    /// Create a new configuration builder.
    pub fn builder() -> KeycloakConfigBuilder {
        KeycloakConfigBuilder::new()
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KEYCLOAK_URL` (required): server URL
    /// - `KEYCLOAK_REALM` (required): realm to administer
    /// - `KEYCLOAK_CLIENT_ID` (required): client id
    /// - `KEYCLOAK_CLIENT_SECRET` (required): client secret
    /// - `KEYCLOAK_AUTH_REALM` (optional): realm to authenticate against
    /// - `KEYCLOAK_BASE_PATH` (optional): relative path, defaults to `/auth`
    /// - `KEYCLOAK_TIMEOUT` (optional): request timeout in seconds
    pub fn from_env() -> KeycloakResult<Self> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| ConfigurationError::MissingField {
                field: name.to_string(),
            })
        };

        let mut builder = KeycloakConfigBuilder::new()
            .url(required("KEYCLOAK_URL")?)
            .realm(required("KEYCLOAK_REALM")?)
            .client_id(required("KEYCLOAK_CLIENT_ID")?)
            .client_secret(required("KEYCLOAK_CLIENT_SECRET")?);

        if let Ok(auth_realm) = std::env::var("KEYCLOAK_AUTH_REALM") {
            builder = builder.auth_realm(auth_realm);
        }

        if let Ok(base_path) = std::env::var("KEYCLOAK_BASE_PATH") {
            builder = builder.base_path(base_path);
        }

        if let Ok(timeout_str) = std::env::var("KEYCLOAK_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        builder.build()
    }

    /// Realm used for the token endpoint.
    pub fn auth_realm(&self) -> &str {
        match self.auth_realm.as_deref() {
            Some(realm) if !realm.is_empty() => realm,
            _ => &self.realm,
        }
    }

    /// Server URL combined with the base path, without a trailing slash.
    pub fn base_url(&self) -> String {
        compose_base_url(&self.url, &self.base_path)
    }

    /// OpenID Connect token endpoint of the authentication realm.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            self.auth_realm()
        )
    }

    /// Base URL all admin requests are resolved against.
    pub fn admin_base_url(&self) -> String {
        format!("{}/admin/realms/", self.base_url())
    }
}

impl std::fmt::Debug for KeycloakConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("realm", &self.realm)
            .field("url", &self.url)
            .field("auth_realm", &self.auth_realm)
            .field("base_path", &self.base_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Join a server URL and a relative base path, collapsing the slashes around both.
///
/// An empty or `/` base path yields the bare URL.
pub fn compose_base_url(url: &str, base_path: &str) -> String {
    let combined = format!(
        "{}/{}",
        url.trim_end_matches('/'),
        base_path.trim_start_matches('/')
    );
    combined.trim_matches('/').to_string()
}
