//! Session lifecycle
//!
//! A session is the pairing of one access token and one refresh token held by
//! a client. Its state is tracked per request by the use cases; the durable
//! part is only the refresh token stored on the account.
//!
//! ```text
//! Unauthenticated --LoggedIn--> Authenticated --AccessExpired--> AccessExpired
//! Unauthenticated --LoginFailed--> Unauthenticated
//! Authenticated | AccessExpired --Refreshed--> Rotated --RotationCompleted--> Authenticated
//! Authenticated | AccessExpired --ReuseDetected--> Revoked
//! any --LoggedOut--> Revoked
//! ```

use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::domain::value_object::token::{AccessToken, RefreshToken};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    AccessExpired,
    /// New pair issued and persisted, not yet handed to the client
    Rotated,
    /// No usable refresh token remains
    Revoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionEvent {
    LoggedIn,
    LoginFailed,
    AccessExpired,
    Refreshed,
    RotationCompleted,
    ReuseDetected,
    LoggedOut,
}

impl SessionState {
    /// Next state, or `Internal` for a transition the lifecycle does not have
    pub fn apply(self, event: SessionEvent) -> AuthResult<Self> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (self, event) {
            (S::Unauthenticated | S::Revoked, E::LoggedIn) => S::Authenticated,
            (S::Unauthenticated, E::LoginFailed) => S::Unauthenticated,
            (S::Authenticated, E::AccessExpired) => S::AccessExpired,
            (S::Authenticated | S::AccessExpired, E::Refreshed) => S::Rotated,
            (S::Rotated, E::RotationCompleted) => S::Authenticated,
            (S::Authenticated | S::AccessExpired, E::ReuseDetected) => S::Revoked,
            (_, E::LoggedOut) => S::Revoked,
            (state, event) => {
                return Err(AuthError::Internal(format!(
                    "illegal session transition: {state} on {event}"
                )));
            }
        };

        Ok(next)
    }
}

/// Freshly issued access and refresh tokens
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: RefreshToken,
    pub refresh_expires_at: DateTime<Utc>,
}
