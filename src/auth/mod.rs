//! Credential Management
//!
//! Credential storage and grant-type selection for admin requests.

pub mod grant;
pub mod store;

pub use grant::{ActiveCredentials, GrantSelector};
pub use store::CredentialStore;
