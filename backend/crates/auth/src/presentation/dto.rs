//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::AccountSummary;
use crate::domain::entity::session::TokenPair;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Non-sensitive account view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaryResponse {
    pub account_id: String,
    pub user_name: String,
    pub email: String,
}

impl From<AccountSummary> for AccountSummaryResponse {
    fn from(summary: AccountSummary) -> Self {
        Self {
            account_id: summary.account_id.to_string(),
            user_name: summary.user_name,
            email: summary.email,
        }
    }
}

// ============================================================================
// Login / Refresh
// ============================================================================

/// Login request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// User name or email
    pub identifier: String,
    pub password: String,
}

/// Refresh request body. Optional: the cookie takes precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Token pair as returned in the body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token.into_inner(),
            access_token_expires_at: pair.access_expires_at,
            refresh_token: pair.refresh_token.into_inner(),
            refresh_token_expires_at: pair.refresh_expires_at,
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    #[serde(flatten)]
    pub tokens: TokenResponse,
    pub account: AccountSummaryResponse,
}

// ============================================================================
// Change Password
// ============================================================================

/// Change password request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}
