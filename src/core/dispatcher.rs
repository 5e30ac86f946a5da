//! Authenticated Dispatch
//!
//! Attaches a bearer token to admin requests and sends them through the transport.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::auth::ActiveCredentials;
use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ConfigurationError, KeycloakResult, RequestError};
use crate::token::{TokenExchange, TokenProvider};
use crate::types::AccessToken;

/// Sends admin requests authenticated under a captured grant.
pub struct AuthenticatedDispatcher<T: HttpTransport, X: TokenExchange> {
    admin_base: Url,
    transport: Arc<T>,
    tokens: TokenProvider<X>,
    timeout: Duration,
}

impl<T: HttpTransport, X: TokenExchange> AuthenticatedDispatcher<T, X> {
    /// Create a dispatcher resolving paths against `admin_base_url`.
    pub fn new(
        admin_base_url: &str,
        transport: Arc<T>,
        tokens: TokenProvider<X>,
        timeout: Duration,
    ) -> KeycloakResult<Self> {
        let admin_base =
            Url::parse(admin_base_url).map_err(|e| ConfigurationError::InvalidEndpoint {
                url: admin_base_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            admin_base,
            transport,
            tokens,
            timeout,
        })
    }

    /// Resolve a path relative to the admin base. Leading slashes are ignored; an
    /// empty path addresses the realm collection itself.
    pub fn resolve(&self, path: &str) -> KeycloakResult<Url> {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            let mut url = self.admin_base.clone();
            let collection = url.path().trim_end_matches('/').to_string();
            url.set_path(&collection);
            return Ok(url);
        }

        self.admin_base.join(relative).map_err(|e| {
            ConfigurationError::InvalidEndpoint {
                url: format!("{}{}", self.admin_base, relative),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Build the authenticated request.
    ///
    /// A body is serialized as JSON with `content-type: application/json`; without one
    /// neither is sent. The bearer header replaces any caller-supplied authorization.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        token: &AccessToken,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &HashMap<String, String>,
    ) -> KeycloakResult<HttpRequest> {
        let mut request_headers: HashMap<String, String> = headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.clone()))
            .collect();

        let body = match body {
            Some(body) => {
                let json = serde_json::to_string(body).map_err(|e| RequestError::Serialization {
                    message: e.to_string(),
                })?;
                request_headers.insert("content-type".to_string(), "application/json".to_string());
                Some(json)
            }
            None => None,
        };

        request_headers.insert("authorization".to_string(), token.authorization_header());

        Ok(HttpRequest {
            method,
            url: self.resolve(path)?.to_string(),
            headers: request_headers,
            body,
            timeout: Some(self.timeout),
        })
    }

    /// Fetch a token for `active`, then send the request.
    ///
    /// The response is returned untouched; transport failures become
    /// `RequestError::Failed` with the status, when there is one.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        active: &ActiveCredentials,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &HashMap<String, String>,
    ) -> KeycloakResult<HttpResponse> {
        let token = self.tokens.fetch_token(active).await?;
        let request = self.build_request(&token, method, path, body, headers)?;

        debug!(method = %method, url = %request.url, grant_type = %active.grant_type, "sending admin request");

        match self.transport.send(request).await {
            Ok(response) => {
                debug!(status = response.status, "admin request completed");
                Ok(response)
            }
            Err(e) => {
                warn!(method = %method, path, status = ?e.status(), error = %e, "admin request failed");
                Err(RequestError::from(e).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::error::{KeycloakError, TransportError};
    use crate::token::MockTokenExchange;
    use crate::types::{CredentialPair, GrantType, TokenResponse};

    const ADMIN_BASE: &str = "http://localhost/auth/admin/realms/";

    fn token_exchange() -> MockTokenExchange {
        let mut exchange = MockTokenExchange::new();
        exchange.expect_exchange().returning(|_| {
            Ok(serde_json::from_value::<TokenResponse>(
                serde_json::json!({"access_token": "bearer-token"}),
            )
            .unwrap())
        });
        exchange
    }

    fn dispatcher(
        transport: Arc<MockHttpTransport>,
    ) -> AuthenticatedDispatcher<MockHttpTransport, MockTokenExchange> {
        AuthenticatedDispatcher::new(
            ADMIN_BASE,
            transport,
            TokenProvider::new(Arc::new(token_exchange())),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn active() -> ActiveCredentials {
        ActiveCredentials {
            grant_type: GrantType::ClientCredentials,
            credentials: Some(CredentialPair::new("admin-cli", "secret")),
        }
    }

    #[test]
    fn test_resolve() {
        let dispatcher = dispatcher(Arc::new(MockHttpTransport::new()));
        assert_eq!(
            dispatcher.resolve("master/roles").unwrap().as_str(),
            "http://localhost/auth/admin/realms/master/roles"
        );
        assert_eq!(
            dispatcher.resolve("/master").unwrap().as_str(),
            "http://localhost/auth/admin/realms/master"
        );
        assert_eq!(
            dispatcher.resolve("").unwrap().as_str(),
            "http://localhost/auth/admin/realms"
        );
    }

    #[tokio::test]
    async fn test_send_without_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(200, "[]"));

        let response = dispatcher(transport.clone())
            .send(&active(), HttpMethod::Get, "master/roles", None::<&()>, &HashMap::new())
            .await
            .unwrap();
        assert_eq!(response.body, "[]");

        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.header("authorization"), Some("Bearer bearer-token"));
        assert_eq!(sent.header("content-type"), None);
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn test_send_with_body_sets_json_content_type() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(201, ""));

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        headers.insert("X-Trace".to_string(), "abc".to_string());

        dispatcher(transport.clone())
            .send(
                &active(),
                HttpMethod::Post,
                "master/roles",
                Some(&serde_json::json!({"name": "auditor"})),
                &headers,
            )
            .await
            .unwrap();

        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.header("content-type"), Some("application/json"));
        assert_eq!(sent.header("x-trace"), Some("abc"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"name":"auditor"}"#));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_request_failed() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(404, r#"{"error":"Realm not found."}"#));

        let error = dispatcher(transport)
            .send(&active(), HttpMethod::Get, "nope", None::<&()>, &HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            KeycloakError::Request(RequestError::Failed {
                status: Some(404),
                source: TransportError::Status { .. },
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_connection_failure_has_no_status() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_error(TransportError::Connection {
            message: "connection refused".to_string(),
        });

        let error = dispatcher(transport)
            .send(&active(), HttpMethod::Delete, "master", None::<&()>, &HashMap::new())
            .await
            .unwrap_err();

        assert_eq!(error.status(), None);
        assert!(error.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_token_failure_skips_transport() {
        let mut exchange = MockTokenExchange::new();
        exchange
            .expect_exchange()
            .returning(|_| Err(crate::error::CredentialsError::Rejected.into()));

        let transport = Arc::new(MockHttpTransport::new());
        let dispatcher = AuthenticatedDispatcher::new(
            ADMIN_BASE,
            transport.clone(),
            TokenProvider::new(Arc::new(exchange)),
            Duration::from_secs(5),
        )
        .unwrap();

        let error = dispatcher
            .send(&active(), HttpMethod::Get, "master", None::<&()>, &HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            KeycloakError::Credentials(crate::error::CredentialsError::Rejected)
        ));
        assert!(transport.get_requests().is_empty());
    }
}
