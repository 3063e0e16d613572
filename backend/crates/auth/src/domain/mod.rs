//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::account::{Account, AccountSummary};
pub use entity::session::{SessionEvent, SessionState, TokenPair};
pub use repository::{AccountRepository, AccountStore, SessionStore};
