//! Configuration Builder
//!
//! Fluent builder for Keycloak client configuration.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::{ConfigurationError, KeycloakResult};
use crate::types::{KeycloakConfig, DEFAULT_BASE_PATH, DEFAULT_TIMEOUT};

/// Keycloak configuration builder.
#[derive(Default)]
pub struct KeycloakConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    realm: Option<String>,
    url: Option<String>,
    auth_realm: Option<String>,
    base_path: Option<String>,
    timeout: Option<Duration>,
}

impl KeycloakConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set the realm admin requests are scoped to.
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Set the server URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Authenticate against another realm (usually `master`).
    pub fn auth_realm(mut self, realm: impl Into<String>) -> Self {
        self.auth_realm = Some(realm.into());
        self
    }

    /// Set the server's relative path. Keycloak 17+ serves without `/auth`.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the Keycloak configuration.
    pub fn build(self) -> KeycloakResult<KeycloakConfig> {
        let client_id = required(self.client_id, "client_id")?;
        let client_secret = required(self.client_secret, "client_secret")?;
        let realm = required(self.realm, "realm")?;
        let url = required(self.url, "url")?;

        Url::parse(&url).map_err(|e| ConfigurationError::InvalidEndpoint {
            url: url.clone(),
            message: e.to_string(),
        })?;

        Ok(KeycloakConfig {
            client_id,
            client_secret,
            realm,
            url,
            auth_realm: self.auth_realm,
            base_path: self
                .base_path
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ConfigurationError> {
    value.ok_or_else(|| ConfigurationError::MissingField {
        field: field.to_string(),
    })
}

/// Create a new Keycloak configuration builder.
pub fn keycloak_config() -> KeycloakConfigBuilder {
    KeycloakConfigBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeycloakError;

    #[test]
    fn test_builder_success() {
        let config = keycloak_config()
            .client_id("admin-cli")
            .client_secret("s3cret")
            .realm("tenant")
            .url("https://sso.example.com")
            .auth_realm("master")
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(config.client_id, "admin-cli");
        assert_eq!(config.base_path, "/auth");
        assert_eq!(config.auth_realm(), "master");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_missing_realm() {
        let result = keycloak_config()
            .client_id("admin-cli")
            .client_secret("s3cret")
            .url("https://sso.example.com")
            .build();

        match result {
            Err(KeycloakError::Configuration(ConfigurationError::MissingField { field })) => {
                assert_eq!(field, "realm")
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_builder_invalid_url() {
        let result = keycloak_config()
            .client_id("admin-cli")
            .client_secret("s3cret")
            .realm("tenant")
            .url("not a url")
            .build();

        assert!(matches!(
            result,
            Err(KeycloakError::Configuration(
                ConfigurationError::InvalidEndpoint { .. }
            ))
        ));
    }
}
