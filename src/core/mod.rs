//! Keycloak Core Components
//!
//! HTTP transport, realm routing and authenticated dispatch.

pub mod dispatcher;
pub mod router;
pub mod transport;

pub use dispatcher::AuthenticatedDispatcher;
pub use router::RealmScopedRouter;
pub use transport::*;
