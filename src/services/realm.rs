//! Realm admin operations.

use serde::Serialize;
use std::collections::HashMap;

use crate::client::KeycloakClient;
use crate::core::{HttpMethod, HttpResponse, HttpTransport, ReqwestHttpTransport};
use crate::error::{absent_on_not_found, KeycloakResult};
use crate::services::{created_resource_id, json_list};
use crate::token::{OAuth2TokenExchange, TokenExchange};
use crate::types::{
    AuthenticationConfig, AuthenticationExecution, AuthenticationFlow, CredentialPair,
    NewAuthenticationConfig, NewAuthenticationExecution, NewAuthenticationFlow, NewRealm, Role,
};

/// Service for the admin API of the client's realm.
///
/// Credential operations act on the client itself; the service keeps no credential
/// state of its own.
pub struct RealmApi<
    'a,
    T: HttpTransport = ReqwestHttpTransport,
    X: TokenExchange = OAuth2TokenExchange<T>,
> {
    client: &'a KeycloakClient<T, X>,
}

impl<'a, T: HttpTransport, X: TokenExchange> RealmApi<'a, T, X> {
    /// Creates a new realm service.
    pub fn new(client: &'a KeycloakClient<T, X>) -> Self {
        Self { client }
    }

    /// Client the service sends through.
    pub fn client(&self) -> &'a KeycloakClient<T, X> {
        self.client
    }

    /// See [`KeycloakClient::set_credentials`].
    pub fn set_credentials(
        &self,
        grant_type: &str,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> &Self {
        self.client.set_credentials(grant_type, identity, secret);
        self
    }

    /// See [`KeycloakClient::unset_credentials`].
    pub fn unset_credentials(&self, grant_type: &str) -> KeycloakResult<()> {
        self.client.unset_credentials(grant_type)
    }

    /// See [`KeycloakClient::set_grant_type`].
    pub fn set_grant_type(
        &self,
        grant_type: &str,
        credentials: Option<CredentialPair>,
    ) -> KeycloakResult<&Self> {
        self.client.set_grant_type(grant_type, credentials)?;
        Ok(self)
    }

    // Realm

    /// Realm representation, `None` if the realm does not exist.
    pub async fn find(&self) -> KeycloakResult<Option<serde_json::Value>> {
        absent_on_not_found(self.get("").await)?
            .map(|response| response.json())
            .transpose()
    }

    /// Creates a realm. Realm creation is not scoped to the client's realm.
    pub async fn create(&self, realm: &NewRealm) -> KeycloakResult<()> {
        self.client
            .send_realmless_request(HttpMethod::Post, "", Some(realm), &HashMap::new())
            .await?;
        Ok(())
    }

    /// Deletes the client's realm.
    pub async fn delete(&self) -> KeycloakResult<()> {
        self.client
            .send_realmless_request(
                HttpMethod::Delete,
                self.client.realm_name(),
                None::<&()>,
                &HashMap::new(),
            )
            .await?;
        Ok(())
    }

    // Authentication flows

    /// Creates an authentication flow and returns its id.
    pub async fn create_authentication_flow(
        &self,
        flow: &NewAuthenticationFlow,
    ) -> KeycloakResult<String> {
        let response = self
            .send(HttpMethod::Post, "authentication/flows", Some(flow))
            .await?;
        created_resource_id(&response)
    }

    /// Lists authentication flows.
    pub async fn get_authentication_flows(&self) -> KeycloakResult<Vec<AuthenticationFlow>> {
        self.get("authentication/flows").await?.json()
    }

    /// Gets an authentication flow by id.
    pub async fn get_authentication_flow(
        &self,
        id: &str,
    ) -> KeycloakResult<Option<AuthenticationFlow>> {
        absent_on_not_found(self.get(&format!("authentication/flows/{}", id)).await)?
            .map(|response| response.json())
            .transpose()
    }

    /// Finds an authentication flow by alias.
    pub async fn get_authentication_flow_by_alias(
        &self,
        alias: &str,
    ) -> KeycloakResult<Option<AuthenticationFlow>> {
        Ok(self
            .get_authentication_flows()
            .await?
            .into_iter()
            .find(|flow| flow.alias == alias))
    }

    /// Deletes an authentication flow.
    pub async fn delete_authentication_flow(&self, id: &str) -> KeycloakResult<()> {
        self.send(
            HttpMethod::Delete,
            &format!("authentication/flows/{}", id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    // Executions

    /// Adds an execution to a flow and returns its id.
    pub async fn create_authentication_flow_execution(
        &self,
        flow_alias: &str,
        execution: &NewAuthenticationExecution,
    ) -> KeycloakResult<String> {
        let response = self
            .send(
                HttpMethod::Post,
                &format!("authentication/flows/{}/executions/execution", flow_alias),
                Some(execution),
            )
            .await?;
        created_resource_id(&response)
    }

    /// Lists the executions of a flow.
    pub async fn get_authentication_flow_executions(
        &self,
        flow_alias: &str,
    ) -> KeycloakResult<Vec<AuthenticationExecution>> {
        self.get(&format!("authentication/flows/{}/executions", flow_alias))
            .await?
            .json()
    }

    /// Finds an execution of a flow by id.
    pub async fn get_authentication_flow_execution(
        &self,
        flow_alias: &str,
        id: &str,
    ) -> KeycloakResult<Option<AuthenticationExecution>> {
        Ok(self
            .get_authentication_flow_executions(flow_alias)
            .await?
            .into_iter()
            .find(|execution| execution.id == id))
    }

    /// Updates an execution of a flow. Returns `false` if the flow or execution is gone.
    pub async fn update_authentication_flow_execution(
        &self,
        flow_alias: &str,
        execution: &AuthenticationExecution,
    ) -> KeycloakResult<bool> {
        let result = self
            .send(
                HttpMethod::Put,
                &format!("authentication/flows/{}/executions", flow_alias),
                Some(execution),
            )
            .await;
        Ok(absent_on_not_found(result)?.is_some())
    }

    /// Deletes an execution.
    pub async fn delete_authentication_flow_execution(
        &self,
        execution_id: &str,
    ) -> KeycloakResult<()> {
        self.send(
            HttpMethod::Delete,
            &format!("authentication/executions/{}", execution_id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    // Authenticator configs

    /// Gets an authenticator configuration.
    pub async fn get_authentication_config(
        &self,
        id: &str,
    ) -> KeycloakResult<Option<AuthenticationConfig>> {
        absent_on_not_found(self.get(&format!("authentication/config/{}", id)).await)?
            .map(|response| response.json())
            .transpose()
    }

    /// Attaches a configuration to an execution and returns its id.
    pub async fn create_authentication_config(
        &self,
        execution_id: &str,
        config: &NewAuthenticationConfig,
    ) -> KeycloakResult<String> {
        let response = self
            .send(
                HttpMethod::Post,
                &format!("authentication/executions/{}/config", execution_id),
                Some(config),
            )
            .await?;
        created_resource_id(&response)
    }

    /// Deletes an authenticator configuration.
    pub async fn delete_authentication_config(&self, config_id: &str) -> KeycloakResult<()> {
        self.send(
            HttpMethod::Delete,
            &format!("authentication/config/{}", config_id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    // Roles

    /// Lists realm roles.
    pub async fn get_roles(&self) -> KeycloakResult<Vec<Role>> {
        json_list(&self.get("roles").await?)
    }

    async fn get(&self, path: &str) -> KeycloakResult<HttpResponse> {
        self.send(HttpMethod::Get, path, None::<&()>).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> KeycloakResult<HttpResponse> {
        self.client
            .send_request(method, path, body, &HashMap::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::error::{CredentialsError, KeycloakError};
    use crate::types::{GrantType, KeycloakConfig};
    use serde_json::json;
    use std::sync::Arc;

    const ADMIN: &str = "http://localhost:8080/admin/realms";

    fn client(transport: Arc<MockHttpTransport>) -> KeycloakClient<MockHttpTransport> {
        let config = KeycloakConfig::builder()
            .client_id("admin-cli")
            .client_secret("client-secret")
            .realm("tenant")
            .url("http://localhost:8080")
            .base_path("")
            .build()
            .unwrap();
        KeycloakClient::with_transport(config, transport).unwrap()
    }

    fn respond(transport: &MockHttpTransport, response: HttpResponse) {
        transport.queue_json_response(200, &json!({"access_token": "tok"}));
        transport.queue_response(response);
    }

    fn flow_json(id: &str, alias: &str) -> serde_json::Value {
        json!({
            "id": id,
            "alias": alias,
            "providerId": "basic-flow",
            "topLevel": true,
            "builtIn": false,
            "authenticationExecutions": []
        })
    }

    #[tokio::test]
    async fn test_find_missing_realm() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(404, r#"{"error":"Realm not found."}"#));

        let client = client(transport.clone());
        assert!(client.realm().find().await.unwrap().is_none());
        assert_eq!(
            transport.get_last_request().unwrap().url,
            format!("{}/tenant", ADMIN)
        );
    }

    #[tokio::test]
    async fn test_find_other_errors_propagate() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(403, ""));

        let client = client(transport);
        let error = client.realm().find().await.unwrap_err();
        assert_eq!(error.status(), Some(403));
    }

    #[tokio::test]
    async fn test_create_and_delete_realm_are_realmless() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(201, ""));
        respond(&transport, HttpResponse::new(204, ""));

        let client = client(transport.clone());
        let realm = client.realm();
        realm
            .create(&NewRealm {
                realm: "tenant".to_string(),
                enabled: true,
                display_name: None,
            })
            .await
            .unwrap();
        realm.delete().await.unwrap();

        let requests = transport.get_requests();
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].url, ADMIN);
        assert_eq!(
            requests[1].body.as_deref(),
            Some(r#"{"realm":"tenant","enabled":true}"#)
        );
        assert_eq!(requests[3].method, HttpMethod::Delete);
        assert_eq!(requests[3].url, format!("{}/tenant", ADMIN));
    }

    #[tokio::test]
    async fn test_create_authentication_flow_returns_id() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(
            &transport,
            HttpResponse::new(201, "").with_header(
                "location",
                format!("{}/tenant/authentication/flows/flow-1", ADMIN),
            ),
        );

        let client = client(transport.clone());
        let id = client
            .realm()
            .create_authentication_flow(&NewAuthenticationFlow::new("browser-copy"))
            .await
            .unwrap();
        assert_eq!(id, "flow-1");

        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.url, format!("{}/tenant/authentication/flows", ADMIN));
        assert_eq!(sent.header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_get_authentication_flow_by_alias() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(
            &transport,
            HttpResponse::new(
                200,
                json!([flow_json("1", "browser"), flow_json("2", "direct grant")]).to_string(),
            ),
        );
        respond(&transport, HttpResponse::new(200, "[]"));

        let client = client(transport);
        let realm = client.realm();
        let flow = realm
            .get_authentication_flow_by_alias("direct grant")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(flow.id, "2");

        assert!(realm
            .get_authentication_flow_by_alias("browser")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_authentication_flow_not_found() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(404, ""));
        respond(&transport, HttpResponse::new(200, flow_json("7", "x").to_string()));

        let client = client(transport);
        let realm = client.realm();
        assert!(realm.get_authentication_flow("gone").await.unwrap().is_none());
        assert_eq!(
            realm.get_authentication_flow("7").await.unwrap().unwrap().alias,
            "x"
        );
    }

    #[tokio::test]
    async fn test_executions() {
        let execution = json!({
            "id": "exec-1",
            "requirement": "DISABLED",
            "requirementChoices": ["REQUIRED", "DISABLED"],
            "configurable": true,
            "providerId": "auth-otp-form",
            "level": 0,
            "index": 0
        });

        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(200, json!([execution]).to_string()));
        respond(&transport, HttpResponse::new(202, ""));
        respond(&transport, HttpResponse::new(404, ""));

        let client = client(transport.clone());
        let realm = client.realm();

        let mut found = realm
            .get_authentication_flow_execution("browser-copy", "exec-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.alias, "");
        assert_eq!(
            transport.get_last_request().unwrap().url,
            format!("{}/tenant/authentication/flows/browser-copy/executions", ADMIN)
        );

        found.requirement = "REQUIRED".to_string();
        assert!(realm
            .update_authentication_flow_execution("browser-copy", &found)
            .await
            .unwrap());
        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Put);
        assert!(sent.body.unwrap().contains(r#""requirement":"REQUIRED""#));

        assert!(!realm
            .update_authentication_flow_execution("gone", &found)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_authentication_config_lifecycle() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(
            &transport,
            HttpResponse::new(201, "").with_header("location", format!("{}/tenant/authentication/config/cfg-9", ADMIN)),
        );
        respond(&transport, HttpResponse::new(404, ""));
        respond(&transport, HttpResponse::new(204, ""));

        let client = client(transport.clone());
        let realm = client.realm();

        let mut config = HashMap::new();
        config.insert("otpType".to_string(), "totp".to_string());
        let id = realm
            .create_authentication_config(
                "exec-1",
                &NewAuthenticationConfig {
                    alias: "otp".to_string(),
                    config,
                },
            )
            .await
            .unwrap();
        assert_eq!(id, "cfg-9");

        assert!(realm.get_authentication_config("cfg-0").await.unwrap().is_none());

        realm.delete_authentication_config(&id).await.unwrap();
        assert_eq!(
            transport.get_last_request().unwrap().url,
            format!("{}/tenant/authentication/config/cfg-9", ADMIN)
        );
    }

    #[tokio::test]
    async fn test_delete_is_not_absent_on_404() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(404, ""));

        let client = client(transport);
        let error = client
            .realm()
            .delete_authentication_flow("gone")
            .await
            .unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_get_roles() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(200, "null"));
        respond(
            &transport,
            HttpResponse::new(
                200,
                json!([{
                    "id": "r1",
                    "name": "offline_access",
                    "composite": false,
                    "clientRole": false,
                    "containerId": "tenant"
                }])
                .to_string(),
            ),
        );

        let client = client(transport);
        let realm = client.realm();
        assert!(realm.get_roles().await.unwrap().is_empty());

        let roles = realm.get_roles().await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "offline_access");
    }

    #[tokio::test]
    async fn test_grant_changes_apply_to_the_client() {
        let transport = Arc::new(MockHttpTransport::new());
        respond(&transport, HttpResponse::new(200, "[]"));

        let client = client(transport.clone());
        let realm = client.realm();
        realm
            .set_grant_type("password", Some(CredentialPair::new("alice", "pw")))
            .unwrap();
        assert_eq!(client.active_grant_type(), GrantType::Password);

        realm.get_roles().await.unwrap();
        let form = transport.get_requests()[0].body.clone().unwrap();
        assert!(form.contains("username=alice&password=pw"));

        let error = realm.unset_credentials("client_credentials").unwrap_err();
        assert!(matches!(
            error,
            KeycloakError::Credentials(CredentialsError::ProtectedCredential { .. })
        ));
        assert!(client.credentials("client_credentials").is_some());
    }
}
