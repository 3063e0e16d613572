//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a new pair and rotates the stored
//! token with a compare-and-set, so of two concurrent refreshes with the
//! same token at most one can succeed.
//!
//! The loser of such a race sees either a failed compare-and-set or, if it
//! loads after the winner's write, a stored token that no longer matches.
//! Both end in `TokenReuse` without revocation: a mismatch against a stored
//! token younger than `reuse_grace_period` is not treated as a replay.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use crate::application::config::AuthConfig;
use crate::application::token_issuer::{TokenIssuer, TokenKind};
use crate::domain::entity::session::{SessionEvent, SessionState, TokenPair};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{account_id::AccountId, token::RefreshToken};
use crate::error::{AuthError, AuthResult};

/// Refresh output
#[derive(Debug)]
pub struct RefreshOutput {
    pub account_id: AccountId,
    pub tokens: TokenPair,
    pub state: SessionState,
}

/// Refresh use case
pub struct RefreshUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<S> RefreshUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, presented: &str) -> AuthResult<RefreshOutput> {
        // The access token is gone or stale by the time a client refreshes
        let state = SessionState::AccessExpired;

        let verified = self.issuer.verify_token(presented, TokenKind::Refresh)?;
        if verified.expired {
            return Err(AuthError::ExpiredToken);
        }
        let account_id = verified.account_id;

        let Some(stored) = self.store.load_active_refresh_token(&account_id).await? else {
            state.apply(SessionEvent::LoggedOut)?;
            tracing::info!(account_id = %account_id, "Refresh after logout rejected");
            return Err(AuthError::InvalidToken);
        };

        if !stored.matches(presented) {
            state.apply(SessionEvent::ReuseDetected)?;
            let revoke =
                self.config.revoke_on_token_reuse && !self.rotated_within_grace(&stored);
            tracing::warn!(
                account_id = %account_id,
                revoke,
                "Superseded refresh token presented"
            );
            if revoke {
                self.store.clear_refresh_token(&account_id).await?;
            }
            return Err(AuthError::TokenReuse);
        }

        let tokens = self.issuer.issue_pair(&account_id)?;
        let state = state.apply(SessionEvent::Refreshed)?;

        let swapped = self
            .store
            .compare_and_set_refresh_token(&account_id, &stored, &tokens.refresh_token)
            .await?;

        if !swapped {
            // Lost the race to a concurrent refresh. The winner's token stays.
            tracing::warn!(account_id = %account_id, "Concurrent refresh lost compare-and-set");
            return Err(AuthError::TokenReuse);
        }

        let state = state.apply(SessionEvent::RotationCompleted)?;

        tracing::info!(account_id = %account_id, "Refresh token rotated");

        Ok(RefreshOutput {
            account_id,
            tokens,
            state,
        })
    }

    /// Whether the stored token was issued so recently that the mismatch is
    /// a concurrent refresh that already rotated, not a replay
    fn rotated_within_grace(&self, stored: &RefreshToken) -> bool {
        let Ok(current) = self.issuer.verify_token(stored.as_str(), TokenKind::Refresh) else {
            return false;
        };
        let Ok(grace) = TimeDelta::from_std(self.config.reuse_grace_period) else {
            return false;
        };
        Utc::now() - current.issued_at < grace
    }
}
