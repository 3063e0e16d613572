//! Account Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, email::Email, token::RefreshToken, user_name::UserName,
    user_password::UserPassword,
};

/// Account entity
///
/// `active_refresh_token` is either absent or the most recently issued
/// refresh token. There is no history.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    /// Lowercase, unique
    pub user_name: UserName,
    /// Lowercase, unique
    pub email: Email,
    pub password_hash: UserPassword,
    pub active_refresh_token: Option<RefreshToken>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with no session
    pub fn new(user_name: UserName, email: Email, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            user_name,
            email,
            password_hash,
            active_refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Non-sensitive projection
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            account_id: self.account_id,
            user_name: self.user_name.as_str().to_string(),
            email: self.email.as_str().to_string(),
        }
    }
}

/// What login and registration hand back: never the hash or a stored token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub user_name: String,
    pub email: String,
}
