//! Keycloak admin API services.

mod realm;
mod response;

pub use realm::*;
pub use response::*;
