//! Middleware del sistema
//!
//! Autenticación, resolución de acceso a talleres y CORS.

pub mod auth;
pub mod cors;
pub mod workshop_access;

pub use auth::{auth_middleware, AuthenticatedUser};
pub use cors::cors_layer;
pub use workshop_access::workshop_access_middleware;
