//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every operation that addresses one account by id reports
//! `AuthError::AccountNotFound` when the row does not exist and
//! `AuthError::StoreUnavailable` when the store cannot be reached in time.

use crate::domain::entity::account::Account;
use crate::domain::value_object::{
    account_id::AccountId, email::Email, token::RefreshToken, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account (`AccountExists` on a duplicate user name or email)
    async fn create(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<Account>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool>;

    /// Replace the stored password hash
    async fn update_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &UserPassword,
    ) -> AuthResult<()>;
}

/// The single point that reads and writes an account's active refresh token
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Current refresh token, `None` when logged out or never logged in
    async fn load_active_refresh_token(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<RefreshToken>>;

    /// Unconditionally replace the stored token
    async fn store_refresh_token(&self, account_id: &AccountId, token: &RefreshToken)
    -> AuthResult<()>;

    /// Replace the stored token only if it still equals `expected`.
    ///
    /// A single atomic write. Returns `false` when another writer got there
    /// first or the token was cleared.
    async fn compare_and_set_refresh_token(
        &self,
        account_id: &AccountId,
        expected: &RefreshToken,
        new: &RefreshToken,
    ) -> AuthResult<bool>;

    async fn clear_refresh_token(&self, account_id: &AccountId) -> AuthResult<()>;
}

/// Everything the auth use cases need from one backing store
pub trait AccountStore: AccountRepository + SessionStore + Clone + Send + Sync + 'static {}

impl<T> AccountStore for T where T: AccountRepository + SessionStore + Clone + Send + Sync + 'static {}
