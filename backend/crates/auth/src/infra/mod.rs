//! Infrastructure Layer
//!
//! Account store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;
