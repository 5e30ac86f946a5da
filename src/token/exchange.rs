//! Token Exchange
//!
//! Exchanges grant parameters for an access token at the OpenID Connect token endpoint.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{KeycloakResult, RequestError};
use crate::types::{CredentialPair, GrantType, TokenParameters, TokenResponse};

/// Grant parameters for one token request.
#[derive(Clone, Debug)]
pub struct TokenRequest {
    /// Grant type sent as `grant_type`.
    pub grant_type: GrantType,
    /// Names the credential pair is bound to.
    pub parameters: TokenParameters,
    /// Identity and secret of the grant.
    pub credentials: CredentialPair,
}

impl TokenRequest {
    /// Grant-specific form fields, identity first.
    pub fn grant_fields(&self) -> [(&'static str, &str); 2] {
        [
            (self.parameters.identity, self.credentials.identity()),
            (self.parameters.secret, self.credentials.expose_secret()),
        ]
    }
}

/// Token endpoint interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Request an access token for the given grant.
    async fn exchange(&self, request: TokenRequest) -> KeycloakResult<TokenResponse>;
}

/// Form-encoded token exchange over an [`HttpTransport`].
///
/// Every request carries the client's own `client_id`/`client_secret`; grant fields
/// with the same names replace them.
pub struct OAuth2TokenExchange<T: HttpTransport> {
    token_endpoint: String,
    client: CredentialPair,
    transport: Arc<T>,
    timeout: Duration,
}

impl<T: HttpTransport> OAuth2TokenExchange<T> {
    /// Create new token exchange.
    pub fn new(
        token_endpoint: impl Into<String>,
        client: CredentialPair,
        transport: Arc<T>,
        timeout: Duration,
    ) -> Self {
        Self {
            token_endpoint: token_endpoint.into(),
            client,
            transport,
            timeout,
        }
    }

    /// Token endpoint URL.
    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    fn build_request_body(&self, request: &TokenRequest) -> String {
        let grant_fields = request.grant_fields();
        let overridden = |name: &str| grant_fields.iter().any(|(key, _)| *key == name);

        let mut form = url::form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", request.grant_type.as_str());

        if !overridden("client_id") {
            form.append_pair("client_id", self.client.identity());
        }
        if !overridden("client_secret") {
            form.append_pair("client_secret", self.client.expose_secret());
        }

        for (key, value) in grant_fields {
            form.append_pair(key, value);
        }

        form.finish()
    }

    fn build_request_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());
        headers
    }
}

#[async_trait]
impl<T: HttpTransport> TokenExchange for OAuth2TokenExchange<T> {
    async fn exchange(&self, request: TokenRequest) -> KeycloakResult<TokenResponse> {
        let http_request = HttpRequest {
            method: HttpMethod::Post,
            url: self.token_endpoint.clone(),
            headers: self.build_request_headers(),
            body: Some(self.build_request_body(&request)),
            timeout: Some(self.timeout),
        };

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(RequestError::from)?;

        response.json()
    }
}
