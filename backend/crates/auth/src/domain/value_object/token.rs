//! Signed token strings
//!
//! Opaque to everything outside the token issuer. `Debug` never prints the
//! value.

use platform::crypto::constant_time_eq;
use std::fmt;

/// Short-lived credential for individual requests
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// Long-lived credential whose only valid copy lives on the account
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    /// Wrap a value read back from the account store
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Constant-time comparison against a presented token
    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), presented.as_bytes())
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let token = RefreshToken::new("abc.def".to_string());
        assert!(token.matches("abc.def"));
        assert!(!token.matches("abc.deg"));
        assert!(!token.matches(""));
    }

    #[test]
    fn test_debug_is_redacted() {
        let access = AccessToken::new("secret-access".to_string());
        let refresh = RefreshToken::from_db("secret-refresh");
        assert!(!format!("{access:?}").contains("secret"));
        assert!(!format!("{refresh:?}").contains("secret"));
    }
}
