//! Keycloak Error Types
//!
//! Error hierarchy for credential management, token acquisition and admin requests.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the Keycloak client.
#[derive(Error, Debug)]
pub enum KeycloakError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl KeycloakError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "KEYCLOAK_CONFIG",
            Self::Credentials(e) => e.error_code(),
            Self::Request(_) => "KEYCLOAK_REQUEST",
            Self::Protocol(_) => "KEYCLOAK_PROTOCOL",
        }
    }

    /// HTTP status of the failed admin request, when the transport reported one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(RequestError::Failed { status, .. }) => *status,
            _ => None,
        }
    }

    /// Check if the admin API answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the caller has to re-authenticate (new credentials or grant) before retrying.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Credentials(CredentialsError::Rejected) => true,
            Self::Credentials(CredentialsError::NoUsableCredentials { .. }) => true,
            Self::Request(RequestError::Failed {
                status: Some(401), ..
            }) => true,
            _ => false,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid endpoint URL {url}: {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("Failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

/// Credential and grant-type error.
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Cannot use grant type \"{grant_type}\": credentials not found, and were not provided")]
    MissingCredentials { grant_type: String },

    #[error("\"{grant_type}\" grant type cannot be removed from the base client")]
    ProtectedCredential { grant_type: String },

    #[error("Unsupported grant type: \"{grant_type}\"")]
    UnsupportedGrantType { grant_type: String },

    #[error("Unable to find usable authentication credentials for grant type \"{grant_type}\"")]
    NoUsableCredentials { grant_type: String },

    // Opaque on purpose: the exchange error may carry secrets or provider internals.
    #[error("Credentials were rejected by the token endpoint")]
    Rejected,
}

impl CredentialsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials { .. } => "KEYCLOAK_MISSING_CREDENTIALS",
            Self::ProtectedCredential { .. } => "KEYCLOAK_PROTECTED_CREDENTIAL",
            Self::UnsupportedGrantType { .. } => "KEYCLOAK_UNSUPPORTED_GRANT",
            Self::NoUsableCredentials { .. } => "KEYCLOAK_NO_USABLE_CREDENTIALS",
            Self::Rejected => "KEYCLOAK_CREDENTIALS_REJECTED",
        }
    }
}

/// Authenticated admin request error.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("{message}")]
    Failed {
        status: Option<u16>,
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to serialize request body: {message}")]
    Serialization { message: String },
}

impl From<TransportError> for RequestError {
    fn from(error: TransportError) -> Self {
        Self::Failed {
            status: error.status(),
            message: error.to_string(),
            source: error,
        }
    }
}

/// Error raised by an [`HttpTransport`](crate::core::HttpTransport).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl TransportError {
    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Response interpretation error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Missing Location header in create response")]
    MissingLocation,

    #[error("Unexpected status {actual}, expected {expected}")]
    UnexpectedStatus { expected: u16, actual: u16 },
}

/// Result type for Keycloak operations.
pub type KeycloakResult<T> = Result<T, KeycloakError>;

/// Turn a 404 from the admin API into `None`, passing every other outcome through.
///
/// Lookup operations opt into this explicitly; mutations never do.
pub fn absent_on_not_found<T>(result: KeycloakResult<T>) -> KeycloakResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
