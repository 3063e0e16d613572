//! PostgreSQL Repository Implementations

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, SessionStore};
use crate::domain::value_object::{
    account_id::AccountId, email::Email, token::RefreshToken, user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    user_name,
    email,
    password_hash,
    active_refresh_token,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgAccountStore {
    /// `timeout` bounds every individual store call
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn timed<T, F>(&self, query: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::StoreUnavailable(format!(
                "account store did not answer within {:?}",
                self.timeout
            ))),
        }
    }

    async fn find_one(&self, column: &str, value: &str) -> AuthResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = $1");
        let row = self
            .timed(
                sqlx::query_as::<_, AccountRow>(&sql)
                    .bind(value)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn exists(&self, account_id: &AccountId) -> AuthResult<bool> {
        self.timed(
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE account_id = $1)",
            )
            .bind(account_id.as_uuid())
            .fetch_one(&self.pool),
        )
        .await
    }

    /// Rows touched by a single-account write, `AccountNotFound` if none
    fn expect_one_row(rows_affected: u64) -> AuthResult<()> {
        if rows_affected == 0 {
            Err(AuthError::AccountNotFound)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountStore {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.timed(
            sqlx::query(
                r#"
                INSERT INTO accounts (
                    account_id,
                    user_name,
                    email,
                    password_hash,
                    active_refresh_token,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(account.account_id.as_uuid())
            .bind(account.user_name.as_str())
            .bind(account.email.as_str())
            .bind(account.password_hash.as_phc_string())
            .bind(account.active_refresh_token.as_ref().map(RefreshToken::as_str))
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1");
        let row = self
            .timed(
                sqlx::query_as::<_, AccountRow>(&sql)
                    .bind(account_id.as_uuid())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<Account>> {
        self.find_one("user_name", user_name.as_str()).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        self.find_one("email", email.as_str()).await
    }

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool> {
        self.timed(
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE user_name = $1 OR email = $2)",
            )
            .bind(user_name.as_str())
            .bind(email.as_str())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update_password_hash(
        &self,
        account_id: &AccountId,
        password_hash: &UserPassword,
    ) -> AuthResult<()> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    UPDATE accounts SET
                        password_hash = $2,
                        updated_at = now()
                    WHERE account_id = $1
                    "#,
                )
                .bind(account_id.as_uuid())
                .bind(password_hash.as_phc_string())
                .execute(&self.pool),
            )
            .await?;

        Self::expect_one_row(result.rows_affected())
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgAccountStore {
    async fn load_active_refresh_token(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<RefreshToken>> {
        let row = self
            .timed(
                sqlx::query_scalar::<_, Option<String>>(
                    "SELECT active_refresh_token FROM accounts WHERE account_id = $1",
                )
                .bind(account_id.as_uuid())
                .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(token) => Ok(token.map(RefreshToken::from_db)),
            None => Err(AuthError::AccountNotFound),
        }
    }

    async fn store_refresh_token(
        &self,
        account_id: &AccountId,
        token: &RefreshToken,
    ) -> AuthResult<()> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    UPDATE accounts SET
                        active_refresh_token = $2,
                        updated_at = now()
                    WHERE account_id = $1
                    "#,
                )
                .bind(account_id.as_uuid())
                .bind(token.as_str())
                .execute(&self.pool),
            )
            .await?;

        Self::expect_one_row(result.rows_affected())
    }

    async fn compare_and_set_refresh_token(
        &self,
        account_id: &AccountId,
        expected: &RefreshToken,
        new: &RefreshToken,
    ) -> AuthResult<bool> {
        // Row-level lock makes the predicate and the write one step
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    UPDATE accounts SET
                        active_refresh_token = $3,
                        updated_at = now()
                    WHERE account_id = $1
                      AND active_refresh_token = $2
                    "#,
                )
                .bind(account_id.as_uuid())
                .bind(expected.as_str())
                .bind(new.as_str())
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        if self.exists(account_id).await? {
            Ok(false)
        } else {
            Err(AuthError::AccountNotFound)
        }
    }

    async fn clear_refresh_token(&self, account_id: &AccountId) -> AuthResult<()> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    UPDATE accounts SET
                        active_refresh_token = NULL,
                        updated_at = now()
                    WHERE account_id = $1
                    "#,
                )
                .bind(account_id.as_uuid())
                .execute(&self.pool),
            )
            .await?;

        Self::expect_one_row(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    user_name: String,
    email: String,
    password_hash: String,
    active_refresh_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            user_name: UserName::from_db(self.user_name),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            active_refresh_token: self.active_refresh_token.map(RefreshToken::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
