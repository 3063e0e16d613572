//! Request identity

use chrono::{DateTime, Utc};

use crate::domain::value_object::account_id::AccountId;

/// Verified identity of the caller, derived from an access token.
///
/// Produced by the authentication middleware and handed to use cases as an
/// argument. Nothing reads it from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: AccountId,
    /// When the access token behind this context stops being accepted
    pub expires_at: DateTime<Utc>,
}
