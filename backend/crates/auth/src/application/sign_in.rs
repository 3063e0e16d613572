//! Sign In Use Case
//!
//! Verifies credentials, issues a token pair and records the refresh token
//! as the account's only valid one.

use std::sync::Arc;

use crate::application::credential_verifier::CredentialVerifier;
use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::account::{Account, AccountSummary};
use crate::domain::entity::session::{SessionEvent, SessionState, TokenPair};
use crate::domain::repository::{AccountRepository, SessionStore};
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    /// User name or email
    pub identifier: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub tokens: TokenPair,
    pub account: AccountSummary,
    pub state: SessionState,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository + SessionStore,
{
    repo: Arc<R>,
    issuer: Arc<TokenIssuer>,
    verifier: CredentialVerifier,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository + SessionStore,
{
    pub fn new(repo: Arc<R>, issuer: Arc<TokenIssuer>, verifier: CredentialVerifier) -> Self {
        Self {
            repo,
            issuer,
            verifier,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let identifier = input.identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::Validation("Identifier is required".to_string()));
        }

        let state = SessionState::Unauthenticated;
        let password = RawPassword::presented(input.password);

        let Some(account) = self.find_account(identifier).await? else {
            // Same cost as a wrong password
            self.verifier.verify_unknown_account(password).await?;
            state.apply(SessionEvent::LoginFailed)?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verifier.verify(password, &account.password_hash).await? {
            state.apply(SessionEvent::LoginFailed)?;
            tracing::warn!(account_id = %account.account_id, "Wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issuer.issue_pair(&account.account_id)?;

        // Replaces any earlier session: one refresh token per account
        self.repo
            .store_refresh_token(&account.account_id, &tokens.refresh_token)
            .await?;

        let state = state.apply(SessionEvent::LoggedIn)?;

        tracing::info!(account_id = %account.account_id, "Account signed in");

        Ok(SignInOutput {
            tokens,
            account: account.summary(),
            state,
        })
    }

    /// Email if the identifier contains `@`, user name otherwise. An
    /// identifier that cannot be either simply matches nothing.
    async fn find_account(&self, identifier: &str) -> AuthResult<Option<Account>> {
        if identifier.contains('@') {
            match Email::new(identifier) {
                Ok(email) => self.repo.find_by_email(&email).await,
                Err(_) => Ok(None),
            }
        } else {
            match UserName::new(identifier) {
                Ok(user_name) => self.repo.find_by_user_name(&user_name).await,
                Err(_) => Ok(None),
            }
        }
    }
}
