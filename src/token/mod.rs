//! Token Acquisition
//!
//! Token endpoint exchange and per-request token provisioning.

pub mod exchange;
pub mod provider;

pub use exchange::{OAuth2TokenExchange, TokenExchange, TokenRequest};
pub use provider::TokenProvider;

#[cfg(test)]
pub use exchange::MockTokenExchange;
