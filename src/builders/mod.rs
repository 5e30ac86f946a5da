//! Builders
//!
//! Fluent builder for Keycloak client configuration.

pub mod config;

pub use config::{keycloak_config, KeycloakConfigBuilder};
