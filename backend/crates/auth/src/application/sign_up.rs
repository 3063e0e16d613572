//! Sign Up Use Case
//!
//! Registers a new account with no session.

use std::sync::Arc;

use crate::application::credential_verifier::CredentialVerifier;
use crate::domain::entity::account::{Account, AccountSummary};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    verifier: CredentialVerifier,
}

impl<R> SignUpUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, verifier: CredentialVerifier) -> Self {
        Self { repo, verifier }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<AccountSummary> {
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(&input.email)?;
        let password = RawPassword::new(input.password)?;

        if self
            .repo
            .exists_by_user_name_or_email(&user_name, &email)
            .await?
        {
            return Err(AuthError::AccountExists);
        }

        let password_hash = self.verifier.hash(password).await?;
        let account = Account::new(user_name, email, password_hash);

        // A concurrent registration can still win the unique index
        self.repo.create(&account).await?;

        tracing::info!(account_id = %account.account_id, "Account registered");

        Ok(account.summary())
    }
}
