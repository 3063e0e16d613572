//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, session lifecycle, store traits
//! - `application/` - Use cases, token issuer, credential verifier, config
//! - `infra/` - PostgreSQL and in-memory account stores
//! - `presentation/` - HTTP handlers, DTOs, cookie binding, router
//!
//! ## Features
//! - Registration and login by user name or email
//! - Short-lived access token plus long-lived refresh token, both HMAC signed
//! - Refresh token rotation with compare-and-set, reuse detection
//! - One active session per account
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Unknown accounts and wrong passwords are indistinguishable to clients
//! - Tokens travel in `HttpOnly` cookies (bearer header accepted for access)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::context::AuthContext;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAccountStore, postgres::PgAccountStore};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::account::*;
    pub use crate::domain::entity::session::*;
    pub use crate::presentation::dto::*;
}
