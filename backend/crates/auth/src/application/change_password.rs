//! Change Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::context::AuthContext;
use crate::application::credential_verifier::CredentialVerifier;
use crate::domain::repository::{AccountRepository, SessionStore};
use crate::domain::value_object::user_password::RawPassword;
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

/// Change password output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangePasswordOutput {
    /// The stored refresh token was cleared along with the change
    pub sessions_revoked: bool,
}

/// Change password use case
pub struct ChangePasswordUseCase<R>
where
    R: AccountRepository + SessionStore,
{
    repo: Arc<R>,
    verifier: CredentialVerifier,
    config: Arc<AuthConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: AccountRepository + SessionStore,
{
    pub fn new(repo: Arc<R>, verifier: CredentialVerifier, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            verifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        context: &AuthContext,
        input: ChangePasswordInput,
    ) -> AuthResult<ChangePasswordOutput> {
        // Policy first: a rejected new password costs no hash
        let new_password = RawPassword::new(input.new_password)?;

        let account = self
            .repo
            .find_by_id(&context.account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let old_password = RawPassword::presented(input.old_password);
        if !self
            .verifier
            .verify(old_password, &account.password_hash)
            .await?
        {
            tracing::warn!(account_id = %account.account_id, "Password change with wrong current password");
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = self.verifier.hash(new_password).await?;
        self.repo
            .update_password_hash(&account.account_id, &new_hash)
            .await?;

        let sessions_revoked = self.config.revoke_sessions_on_password_change;
        if sessions_revoked {
            self.repo.clear_refresh_token(&account.account_id).await?;
        }

        tracing::info!(
            account_id = %account.account_id,
            sessions_revoked,
            "Password changed"
        );

        Ok(ChangePasswordOutput { sessions_revoked })
    }
}
