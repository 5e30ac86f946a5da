//! Keycloak Admin Integration Module
//!
//! Keycloak admin REST client with per-request credential selection.
//!
//! # Features
//!
//! - Credential store keyed by OAuth2 grant type (`client_credentials`, `password`)
//! - Grant-type switching between requests, with the client's own credentials protected
//! - Fresh access token from the OpenID Connect token endpoint for every request
//! - Realm-scoped and realmless admin requests with bearer authentication
//! - Realm, authentication flow, execution, authenticator config and role operations
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_keycloak::{keycloak_config, CredentialPair, KeycloakClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = keycloak_config()
//!         .url("https://sso.example.com")
//!         .realm("tenant")
//!         .auth_realm("master")
//!         .client_id("admin-cli")
//!         .client_secret("client-secret")
//!         .base_path("")
//!         .build()?;
//!
//!     let client = KeycloakClient::new(config)?;
//!
//!     // Authenticated with the client's own credentials
//!     let roles = client.realm().get_roles().await?;
//!     println!("{} roles", roles.len());
//!
//!     // Act as a user from here on
//!     client.set_grant_type("password", Some(CredentialPair::new("alice", "pw")))?;
//!     let realm = client.realm().find().await?;
//!     println!("{:?}", realm);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, credential, token and realm entity types
//! - `error`: error hierarchy and the 404 policy helper
//! - `auth`: credential store and grant-type selection
//! - `token`: token endpoint exchange and per-request token provisioning
//! - `core`: HTTP transport, realm routing and authenticated dispatch
//! - `builders`: fluent configuration builder
//! - `services`: realm admin API
//! - `client`: `KeycloakClient` tying it together

pub mod auth;
pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod services;
pub mod token;
pub mod types;

// Re-export main client
pub use client::KeycloakClient;

// Re-export builders
pub use builders::{keycloak_config, KeycloakConfigBuilder};

// Re-export errors
pub use error::{
    absent_on_not_found, ConfigurationError, CredentialsError, KeycloakError, KeycloakResult,
    ProtocolError, RequestError, TransportError,
};

// Re-export types
pub use types::{
    // Config
    KeycloakConfig, DEFAULT_BASE_PATH, DEFAULT_TIMEOUT,
    // Credentials
    CredentialPair, GrantType, TokenParameters,
    // Token
    AccessToken, TokenResponse,
    // Realm
    AuthenticationConfig, AuthenticationExecution, AuthenticationFlow, NewAuthenticationConfig,
    NewAuthenticationExecution, NewAuthenticationFlow, NewRealm, Role,
};

// Re-export credential management
pub use auth::{ActiveCredentials, CredentialStore, GrantSelector};

// Re-export core components
pub use core::{
    AuthenticatedDispatcher, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    MockHttpTransport, RealmScopedRouter, ReqwestHttpTransport,
};

// Re-export token acquisition
pub use token::{OAuth2TokenExchange, TokenExchange, TokenProvider, TokenRequest};

// Re-export services
pub use services::{created_resource_id, RealmApi};
