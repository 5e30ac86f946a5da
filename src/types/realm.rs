//! Realm Entities
//!
//! JSON representations used by the realm admin endpoints. Absent optional fields
//! fall back to the same defaults Keycloak itself omits them for.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Realm-level role.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub composite: bool,
    pub client_role: bool,
    pub container_id: String,
}

/// Authentication flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationFlow {
    pub id: String,
    pub alias: String,
    #[serde(default)]
    pub description: Option<String>,
    pub provider_id: String,
    pub top_level: bool,
    pub built_in: bool,
    #[serde(default)]
    pub authentication_executions: Vec<serde_json::Value>,
}

/// Execution of an authentication flow as listed under `flows/{alias}/executions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationExecution {
    pub id: String,
    #[serde(default)]
    pub alias: String,
    pub requirement: String,
    #[serde(default)]
    pub requirement_choices: Vec<String>,
    pub configurable: bool,
    #[serde(default)]
    pub provider_id: String,
    pub level: i32,
    pub index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_config: Option<String>,
}

/// Authenticator configuration attached to an execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationConfig {
    pub id: String,
    pub alias: String,
    #[serde(default)]
    pub config: HashMap<String, String>,
}

/// Body of a flow creation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthenticationFlow {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider_id: String,
    pub top_level: bool,
    pub built_in: bool,
}

impl NewAuthenticationFlow {
    /// Top-level `basic-flow` with the given alias.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            description: None,
            provider_id: "basic-flow".to_string(),
            top_level: true,
            built_in: false,
        }
    }
}

/// Body of an execution creation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewAuthenticationExecution {
    /// Authenticator provider id, e.g. `auth-cookie`.
    pub provider: String,
}

/// Body of an authenticator configuration creation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewAuthenticationConfig {
    pub alias: String,
    pub config: HashMap<String, String>,
}

/// Body of a realm creation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRealm {
    pub realm: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
