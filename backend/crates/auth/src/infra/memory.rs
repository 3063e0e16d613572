//! In-memory account store
//!
//! Used by tests and local development. Each operation takes the mutex once,
//! so compare-and-set is a single check-and-write like the SQL version.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, SessionStore};
use crate::domain::value_object::{
    account_id::AccountId, email::Email, token::RefreshToken, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to the account, or `AccountNotFound`
    async fn with_account<T>(
        &self,
        account_id: &AccountId,
        f: impl FnOnce(&mut Account) -> T,
    ) -> AuthResult<T> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(account_id)
            .ok_or(AuthError::AccountNotFound)?;
        Ok(f(account))
    }
}

impl AccountRepository for InMemoryAccountStore {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.lock().await;

        let taken = accounts.values().any(|existing| {
            existing.user_name == account.user_name || existing.email == account.email
        });
        if taken || accounts.contains_key(&account.account_id) {
            return Err(AuthError::AccountExists);
        }

        accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.accounts.lock().await.get(account_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| &account.user_name == user_name)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| &account.email == email)
            .cloned())
    }

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .any(|account| &account.user_name == user_name || &account.email == email))
    }

    async fn update_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &UserPassword,
    ) -> AuthResult<()> {
        self.with_account(account_id, |account| {
            account.password_hash = password_hash.clone();
            account.updated_at = Utc::now();
        })
        .await
    }
}

impl SessionStore for InMemoryAccountStore {
    async fn load_active_refresh_token(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<RefreshToken>> {
        self.with_account(account_id, |account| account.active_refresh_token.clone())
            .await
    }

    async fn store_refresh_token(
        &self,
        account_id: &AccountId,
        token: &RefreshToken,
    ) -> AuthResult<()> {
        self.with_account(account_id, |account| {
            account.active_refresh_token = Some(token.clone());
            account.updated_at = Utc::now();
        })
        .await
    }

    async fn compare_and_set_refresh_token(
        &self,
        account_id: &AccountId,
        expected: &RefreshToken,
        new: &RefreshToken,
    ) -> AuthResult<bool> {
        self.with_account(account_id, |account| {
            if account.active_refresh_token.as_ref() != Some(expected) {
                return false;
            }
            account.active_refresh_token = Some(new.clone());
            account.updated_at = Utc::now();
            true
        })
        .await
    }

    async fn clear_refresh_token(&self, account_id: &AccountId) -> AuthResult<()> {
        self.with_account(account_id, |account| {
            account.active_refresh_token = None;
            account.updated_at = Utc::now();
        })
        .await
    }
}
