//! Sign Out Use Case
//!
//! Clears the account's refresh token. The access token already held by the
//! client stays valid until it expires.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::entity::session::{SessionEvent, SessionState};
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, context: &AuthContext) -> AuthResult<SessionState> {
        self.store.clear_refresh_token(&context.account_id).await?;

        tracing::info!(account_id = %context.account_id, "Account signed out");

        SessionState::Authenticated.apply(SessionEvent::LoggedOut)
    }
}
