//! Credential Types
//!
//! Grant types and the identity/secret pairs that authenticate them.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Grant type name of the permanent client entry.
pub const CLIENT_CREDENTIALS: &str = "client_credentials";

/// Grant type name of the resource-owner password grant.
pub const PASSWORD: &str = "password";

/// OAuth2 grant type used to authenticate admin requests.
///
/// Names are case-insensitive; parsing lower-cases them. Grant types without a
/// token-parameter mapping are kept as [`GrantType::Other`] so they can still hold
/// credentials, but cannot be used to fetch a token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
    ClientCredentials,
    Password,
    Other(String),
}

/// Form parameter names carrying the identity and the secret of a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenParameters {
    pub identity: &'static str,
    pub secret: &'static str,
}

impl GrantType {
    /// Parse a grant type name, ignoring case.
    pub fn parse(name: &str) -> Self {
        let normalized = name.to_lowercase();
        match normalized.as_str() {
            CLIENT_CREDENTIALS => Self::ClientCredentials,
            PASSWORD => Self::Password,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientCredentials => CLIENT_CREDENTIALS,
            Self::Password => PASSWORD,
            Self::Other(name) => name,
        }
    }

    /// Token-request parameter names for this grant, `None` when unsupported.
    pub fn token_parameters(&self) -> Option<TokenParameters> {
        match self {
            Self::ClientCredentials => Some(TokenParameters {
                identity: "client_id",
                secret: "client_secret",
            }),
            Self::Password => Some(TokenParameters {
                identity: "username",
                secret: "password",
            }),
            Self::Other(_) => None,
        }
    }
}

impl Default for GrantType {
    fn default() -> Self {
        Self::ClientCredentials
    }
}

impl From<&str> for GrantType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity/secret pair bound to a grant type.
#[derive(Clone)]
pub struct CredentialPair {
    identity: String,
    secret: SecretString,
}

impl CredentialPair {
    /// Create a new credential pair.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: SecretString::new(secret.into()),
        }
    }

    /// Create a pair from an already wrapped secret.
    pub fn from_secret(identity: impl Into<String>, secret: SecretString) -> Self {
        Self {
            identity: identity.into(),
            secret,
        }
    }

    /// Client id or username.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Client secret or password.
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    pub(crate) fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
