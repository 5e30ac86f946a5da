//! Keycloak Types
//!
//! Configuration, credential, token and admin entity types.

pub mod config;
pub mod credentials;
pub mod realm;
pub mod token;

pub use config::*;
pub use credentials::*;
pub use realm::*;
pub use token::*;
