//! Token Provider
//!
//! Fetches a fresh access token for the active grant on every request.

use std::sync::Arc;
use tracing::{trace, warn};

use crate::auth::ActiveCredentials;
use crate::error::{CredentialsError, KeycloakResult};
use crate::token::{TokenExchange, TokenRequest};
use crate::types::AccessToken;

/// Resolves the active grant into an access token.
pub struct TokenProvider<X: TokenExchange> {
    exchange: Arc<X>,
}

impl<X: TokenExchange> TokenProvider<X> {
    /// Create a new token provider.
    pub fn new(exchange: Arc<X>) -> Self {
        Self { exchange }
    }

    /// Fetch an access token for the captured grant and credentials.
    ///
    /// Grant types without a parameter mapping fail with `UnsupportedGrantType`, a
    /// missing pair with `NoUsableCredentials`. Any failure of the exchange itself
    /// becomes `Rejected`; its details are only logged, never returned.
    pub async fn fetch_token(&self, active: &ActiveCredentials) -> KeycloakResult<AccessToken> {
        let grant_type = &active.grant_type;

        let parameters =
            grant_type
                .token_parameters()
                .ok_or_else(|| CredentialsError::UnsupportedGrantType {
                    grant_type: grant_type.to_string(),
                })?;

        let credentials =
            active
                .credentials
                .clone()
                .ok_or_else(|| CredentialsError::NoUsableCredentials {
                    grant_type: grant_type.to_string(),
                })?;

        let request = TokenRequest {
            grant_type: grant_type.clone(),
            parameters,
            credentials,
        };

        match self.exchange.exchange(request).await {
            Ok(response) => {
                trace!(grant_type = %grant_type, expires_in = ?response.expires_in, "access token issued");
                Ok(AccessToken::from_response(&response))
            }
            Err(e) => {
                warn!(
                    grant_type = %grant_type,
                    error_code = e.error_code(),
                    status = ?e.status(),
                    "token exchange failed"
                );
                Err(CredentialsError::Rejected.into())
            }
        }
    }
}
