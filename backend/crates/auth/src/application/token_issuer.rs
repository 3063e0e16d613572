//! Token Issuer
//!
//! Mints and verifies access and refresh tokens. Each kind has its own
//! secret and lifetime and carries its kind in the `typ` claim, so one kind
//! is never accepted as the other.
//!
//! Pure and lock-free: no store access.

use chrono::{DateTime, Utc};
use derive_more::Display;
use platform::crypto::{random_bytes, to_base64url};
use platform::token::{self, TokenCodecError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::context::AuthContext;
use crate::domain::entity::session::TokenPair;
use crate::domain::value_object::{
    account_id::AccountId,
    token::{AccessToken, RefreshToken},
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[display("access")]
    Access,
    #[display("refresh")]
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: Uuid,
    typ: TokenKind,
    /// Seconds since the Unix epoch
    iat: i64,
    /// Seconds since the Unix epoch
    exp: i64,
    /// Random per token so two tokens minted in the same second differ
    jti: String,
}

/// Outcome of a successful signature check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub account_id: AccountId,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
}

pub struct TokenIssuer {
    access_secret: [u8; 32],
    refresh_secret: [u8; 32],
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_token_secret,
            refresh_secret: config.refresh_token_secret,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub fn issue_access_token(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<(AccessToken, DateTime<Utc>)> {
        let (token, expires_at) = self.issue_at(TokenKind::Access, account_id, Utc::now())?;
        Ok((AccessToken::new(token), expires_at))
    }

    pub fn issue_refresh_token(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<(RefreshToken, DateTime<Utc>)> {
        let (token, expires_at) = self.issue_at(TokenKind::Refresh, account_id, Utc::now())?;
        Ok((RefreshToken::new(token), expires_at))
    }

    pub fn issue_pair(&self, account_id: &AccountId) -> AuthResult<TokenPair> {
        let (access_token, access_expires_at) = self.issue_access_token(account_id)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh_token(account_id)?;

        Ok(TokenPair {
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Sign a token as if issued at `now`
    pub(crate) fn issue_at(
        &self,
        kind: TokenKind,
        account_id: &AccountId,
        now: DateTime<Utc>,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let ttl = i64::try_from(self.ttl(kind).as_secs())
            .map_err(|_| AuthError::Internal(format!("{kind} token lifetime out of range")))?;

        let iat = now.timestamp();
        let exp = iat.saturating_add(ttl);
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Internal(format!("{kind} token expiry out of range")))?;

        let claims = TokenClaims {
            sub: *account_id.as_uuid(),
            typ: kind,
            iat,
            exp,
            jti: to_base64url(&random_bytes(16)),
        };

        let signed = token::sign(self.secret(kind), &claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok((signed, expires_at))
    }

    /// Check signature and kind. Expiry is reported, not rejected.
    ///
    /// Any structural problem, including a token of the other kind, is
    /// `InvalidToken`.
    pub fn verify_token(&self, token: &str, kind: TokenKind) -> AuthResult<VerifiedToken> {
        self.verify_at(token, kind, Utc::now())
    }

    fn verify_at(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> AuthResult<VerifiedToken> {
        let claims: TokenClaims = token::verify(self.secret(kind), token).map_err(|e| {
            match e {
                TokenCodecError::BadSignature => {
                    tracing::debug!(kind = %kind, "Token signature mismatch")
                }
                _ => tracing::debug!(kind = %kind, "Malformed token"),
            }
            AuthError::InvalidToken
        })?;

        if claims.typ != kind {
            return Err(AuthError::InvalidToken);
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::InvalidToken)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::InvalidToken)?;

        Ok(VerifiedToken {
            account_id: AccountId::from_uuid(claims.sub),
            kind,
            issued_at,
            expires_at,
            expired: now.timestamp() >= claims.exp,
        })
    }

    /// Verify an access token into a request context
    pub fn authenticate(&self, token: &str) -> AuthResult<AuthContext> {
        let verified = self.verify_token(token, TokenKind::Access)?;
        if verified.expired {
            return Err(AuthError::ExpiredToken);
        }

        Ok(AuthContext {
            account_id: verified.account_id,
            expires_at: verified.expires_at,
        })
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::with_random_secrets())
    }

    #[test]
    fn test_issued_tokens_verify_as_their_account() {
        let issuer = issuer();
        let account_id = AccountId::new();
        let pair = issuer.issue_pair(&account_id).unwrap();

        let access = issuer
            .verify_token(pair.access_token.as_str(), TokenKind::Access)
            .unwrap();
        assert_eq!(access.account_id, account_id);
        assert!(!access.expired);

        let refresh = issuer
            .verify_token(pair.refresh_token.as_str(), TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.account_id, account_id);
        assert!(!refresh.expired);
        assert!(pair.refresh_expires_at > pair.access_expires_at);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&AccountId::new()).unwrap();

        assert!(matches!(
            issuer.verify_token(pair.access_token.as_str(), TokenKind::Refresh),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            issuer.verify_token(pair.refresh_token.as_str(), TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_kind_claim_is_checked_even_with_shared_secret() {
        let secret = platform::crypto::random_key();
        let issuer = TokenIssuer::new(&AuthConfig {
            access_token_secret: secret,
            refresh_token_secret: secret,
            ..Default::default()
        });
        let (refresh, _) = issuer.issue_refresh_token(&AccountId::new()).unwrap();
        assert!(matches!(
            issuer.verify_token(refresh.as_str(), TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_same_second_tokens_differ() {
        let issuer = issuer();
        let account_id = AccountId::new();
        let now = Utc::now();
        let (a, _) = issuer.issue_at(TokenKind::Refresh, &account_id, now).unwrap();
        let (b, _) = issuer.issue_at(TokenKind::Refresh, &account_id, now).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expiry_boundary() {
        let issuer = issuer();
        let account_id = AccountId::new();
        let now = Utc::now();
        let (token, expires_at) = issuer.issue_at(TokenKind::Access, &account_id, now).unwrap();

        let just_before = expires_at - TimeDelta::seconds(1);
        assert!(!issuer.verify_at(&token, TokenKind::Access, just_before).unwrap().expired);
        assert!(issuer.verify_at(&token, TokenKind::Access, expires_at).unwrap().expired);
    }

    #[test]
    fn test_expired_token_is_reported_not_rejected() {
        let issuer = issuer();
        let past = Utc::now() - TimeDelta::days(30);
        let (token, _) = issuer
            .issue_at(TokenKind::Refresh, &AccountId::new(), past)
            .unwrap();

        let verified = issuer.verify_token(&token, TokenKind::Refresh).unwrap();
        assert!(verified.expired);
    }

    #[test]
    fn test_authenticate() {
        let issuer = issuer();
        let account_id = AccountId::new();
        let (access, expires_at) = issuer.issue_access_token(&account_id).unwrap();

        let context = issuer.authenticate(access.as_str()).unwrap();
        assert_eq!(context.account_id, account_id);
        assert_eq!(context.expires_at, expires_at);

        let past = Utc::now() - TimeDelta::hours(1);
        let (stale, _) = issuer.issue_at(TokenKind::Access, &account_id, past).unwrap();
        assert!(matches!(issuer.authenticate(&stale), Err(AuthError::ExpiredToken)));
        assert!(matches!(issuer.authenticate("garbage"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let (token, _) = issuer().issue_access_token(&AccountId::new()).unwrap();
        assert!(matches!(
            issuer().verify_token(token.as_str(), TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }
}
