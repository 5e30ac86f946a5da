//! Admin response helpers.

use serde::de::DeserializeOwned;

use crate::core::HttpResponse;
use crate::error::{KeycloakResult, ProtocolError};

/// Id of a resource created by a `201 Created` response: the last path segment of its
/// `Location` header.
pub fn created_resource_id(response: &HttpResponse) -> KeycloakResult<String> {
    if response.status != 201 {
        return Err(ProtocolError::UnexpectedStatus {
            expected: 201,
            actual: response.status,
        }
        .into());
    }

    response
        .header("location")
        .map(|location| location.trim_end_matches('/'))
        .and_then(|location| location.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProtocolError::MissingLocation.into())
}

/// Deserialize a JSON list; an empty or `null` body is an empty list.
pub fn json_list<T: DeserializeOwned>(response: &HttpResponse) -> KeycloakResult<Vec<T>> {
    let body = response.body.trim();
    if body.is_empty() || body == "null" {
        return Ok(Vec::new());
    }
    response.json()
}
