//! Keycloak Client
//!
//! Owns the credential state and sends authenticated admin requests.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::GrantSelector;
use crate::core::{
    AuthenticatedDispatcher, HttpMethod, HttpResponse, HttpTransport, RealmScopedRouter,
    ReqwestHttpTransport,
};
use crate::error::KeycloakResult;
use crate::services::RealmApi;
use crate::token::{OAuth2TokenExchange, TokenExchange, TokenProvider};
use crate::types::{CredentialPair, GrantType, KeycloakConfig};

/// Keycloak admin client.
///
/// Holds a credential store keyed by grant type and the grant type that authenticates
/// the next request. `client_credentials`, seeded from the configuration, is active
/// initially and cannot be removed.
///
/// Each request captures the active grant and its credentials once, before any I/O.
/// Switching the grant type and then sending is two steps; tasks sharing a client can
/// interleave between them.
pub struct KeycloakClient<T: HttpTransport = ReqwestHttpTransport, X: TokenExchange = OAuth2TokenExchange<T>>
{
    config: KeycloakConfig,
    grants: RwLock<GrantSelector>,
    dispatcher: AuthenticatedDispatcher<T, X>,
    router: RealmScopedRouter,
}

impl KeycloakClient<ReqwestHttpTransport, OAuth2TokenExchange<ReqwestHttpTransport>> {
    /// Create a new client with the default reqwest transport.
    pub fn new(config: KeycloakConfig) -> KeycloakResult<Self> {
        let transport = ReqwestHttpTransport::with_timeout(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }
}

impl<T: HttpTransport> KeycloakClient<T, OAuth2TokenExchange<T>> {
    /// Create a client on a custom transport, shared by token and admin requests.
    pub fn with_transport(config: KeycloakConfig, transport: Arc<T>) -> KeycloakResult<Self> {
        let exchange = OAuth2TokenExchange::new(
            config.token_endpoint(),
            client_pair(&config),
            transport.clone(),
            config.timeout,
        );
        Self::with_components(config, transport, Arc::new(exchange))
    }
}

impl<T: HttpTransport, X: TokenExchange> KeycloakClient<T, X> {
    /// Create a client with custom transport and token exchange.
    pub fn with_components(
        config: KeycloakConfig,
        transport: Arc<T>,
        exchange: Arc<X>,
    ) -> KeycloakResult<Self> {
        let dispatcher = AuthenticatedDispatcher::new(
            &config.admin_base_url(),
            transport,
            TokenProvider::new(exchange),
            config.timeout,
        )?;

        Ok(Self {
            grants: RwLock::new(GrantSelector::new(client_pair(&config))),
            router: RealmScopedRouter::new(config.realm.clone()),
            dispatcher,
            config,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &KeycloakConfig {
        &self.config
    }

    /// Realm admin requests are scoped to.
    pub fn realm_name(&self) -> &str {
        self.router.realm()
    }

    /// Store or overwrite credentials for a grant type. The active grant is unchanged.
    pub fn set_credentials(
        &self,
        grant_type: &str,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> &Self {
        self.grants_mut()
            .set_credentials(GrantType::parse(grant_type), CredentialPair::new(identity, secret));
        self
    }

    /// Remove credentials for a grant type. `client_credentials` is protected.
    pub fn unset_credentials(&self, grant_type: &str) -> KeycloakResult<()> {
        self.grants_mut()
            .unset_credentials(&GrantType::parse(grant_type))?;
        Ok(())
    }

    /// Make a grant type active for subsequent requests.
    ///
    /// Supplied credentials are stored first; without them, credentials must already
    /// be stored for the grant type.
    pub fn set_grant_type(
        &self,
        grant_type: &str,
        credentials: Option<CredentialPair>,
    ) -> KeycloakResult<&Self> {
        self.grants_mut()
            .activate(GrantType::parse(grant_type), credentials)?;
        Ok(self)
    }

    /// Credentials of the permanent `client_credentials` entry.
    pub fn client_credentials(&self) -> CredentialPair {
        self.credentials(crate::types::CLIENT_CREDENTIALS)
            .unwrap_or_else(|| client_pair(&self.config))
    }

    /// Currently active grant type.
    pub fn active_grant_type(&self) -> GrantType {
        self.grants().active().clone()
    }

    /// Stored credentials for a grant type.
    pub fn credentials(&self, grant_type: &str) -> Option<CredentialPair> {
        self.grants()
            .store()
            .get(&GrantType::parse(grant_type))
            .cloned()
    }

    /// Send a request to `{realm}/{path}` under the active grant.
    pub async fn send_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &HashMap<String, String>,
    ) -> KeycloakResult<HttpResponse> {
        let route = self.router.route(path);
        self.send_realmless_request(method, &route, body, headers)
            .await
    }

    /// Send a request to `path` directly beneath the admin base, outside any realm.
    pub async fn send_realmless_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &HashMap<String, String>,
    ) -> KeycloakResult<HttpResponse> {
        let active = self.grants().snapshot();
        self.dispatcher
            .send(&active, method, path, body, headers)
            .await
    }

    /// Realm admin API of the configured realm.
    pub fn realm(&self) -> RealmApi<'_, T, X> {
        RealmApi::new(self)
    }

    fn grants(&self) -> RwLockReadGuard<'_, GrantSelector> {
        self.grants.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn grants_mut(&self) -> RwLockWriteGuard<'_, GrantSelector> {
        self.grants.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: HttpTransport, X: TokenExchange> std::fmt::Debug for KeycloakClient<T, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakClient")
            .field("config", &self.config)
            .field("active_grant_type", &self.active_grant_type())
            .finish()
    }
}

fn client_pair(config: &KeycloakConfig) -> CredentialPair {
    CredentialPair::from_secret(config.client_id.clone(), config.client_secret.clone())
}
