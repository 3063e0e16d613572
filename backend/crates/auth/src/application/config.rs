//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_key;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh token lifetime (10 days)
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(10 * 24 * 3600);

/// Default bound on a single account store round-trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default window in which a superseded refresh token is treated as a
/// concurrent refresh rather than a replay
pub const DEFAULT_REUSE_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Default number of password hashes computed at once
pub const DEFAULT_MAX_CONCURRENT_HASHES: usize = 4;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} secret must not be all zeroes")]
    ZeroSecret(&'static str),

    #[error("access and refresh token secrets must differ")]
    SharedSecret,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("max_concurrent_hashes must be at least 1")]
    NoHashPermits,
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens (32 bytes)
    pub access_token_secret: [u8; 32],
    /// HMAC key for refresh tokens (32 bytes), distinct from the access key
    pub refresh_token_secret: [u8; 32],
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    pub cookie_path: String,
    pub cookie_domain: Option<String>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Clear the stored refresh token when a superseded one is presented
    pub revoke_on_token_reuse: bool,
    /// Reuse is not revoked while the stored token is younger than this.
    /// Zero revokes on every reuse.
    pub reuse_grace_period: Duration,
    /// Clear the stored refresh token after a successful password change
    pub revoke_sessions_on_password_change: bool,
    pub max_concurrent_hashes: usize,
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: [0u8; 32],
            refresh_token_secret: [0u8; 32],
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            cookie_path: "/".to_string(),
            cookie_domain: None,
            password_pepper: None,
            revoke_on_token_reuse: true,
            reuse_grace_period: DEFAULT_REUSE_GRACE_PERIOD,
            revoke_sessions_on_password_change: false,
            max_concurrent_hashes: DEFAULT_MAX_CONCURRENT_HASHES,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl AuthConfig {
    /// Create config with random token secrets (for development and tests)
    pub fn with_random_secrets() -> Self {
        Self {
            access_token_secret: random_key(),
            refresh_token_secret: random_key(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Reject configurations that would make tokens forgeable or unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret == [0u8; 32] {
            return Err(ConfigError::ZeroSecret("access token"));
        }
        if self.refresh_token_secret == [0u8; 32] {
            return Err(ConfigError::ZeroSecret("refresh token"));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::SharedSecret);
        }
        if self.access_token_ttl.is_zero() {
            return Err(ConfigError::ZeroDuration("access_token_ttl"));
        }
        if self.refresh_token_ttl.is_zero() {
            return Err(ConfigError::ZeroDuration("refresh_token_ttl"));
        }
        if self.store_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("store_timeout"));
        }
        if self.max_concurrent_hashes == 0 {
            return Err(ConfigError::NoHashPermits);
        }
        Ok(())
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie carrying the access token
    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(&self.access_cookie_name, self.access_token_ttl)
    }

    /// Cookie carrying the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(&self.refresh_cookie_name, self.refresh_token_ttl)
    }

    fn cookie(&self, name: &str, ttl: Duration) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.cookie_path.clone(),
            domain: self.cookie_domain.clone(),
            max_age_secs: Some(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("refresh_token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("access_cookie_name", &self.access_cookie_name)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_domain", &self.cookie_domain)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("revoke_on_token_reuse", &self.revoke_on_token_reuse)
            .field("reuse_grace_period", &self.reuse_grace_period)
            .field(
                "revoke_sessions_on_password_change",
                &self.revoke_sessions_on_password_change,
            )
            .field("max_concurrent_hashes", &self.max_concurrent_hashes)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl, Duration::from_secs(900));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(864_000));
        assert!(config.cookie_secure);
        assert!(config.revoke_on_token_reuse);
        assert_eq!(config.reuse_grace_period, Duration::from_secs(10));
        assert!(!config.revoke_sessions_on_password_change);
    }

    #[test]
    fn test_default_secrets_are_rejected() {
        assert_eq!(
            AuthConfig::default().validate(),
            Err(ConfigError::ZeroSecret("access token"))
        );
        assert_eq!(AuthConfig::with_random_secrets().validate(), Ok(()));
    }

    #[test]
    fn test_shared_secret_is_rejected() {
        let secret = random_key();
        let config = AuthConfig {
            access_token_secret: secret,
            refresh_token_secret: secret,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SharedSecret));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let config = AuthConfig {
            store_timeout: Duration::ZERO,
            ..AuthConfig::with_random_secrets()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDuration(_))));

        let config = AuthConfig {
            max_concurrent_hashes: 0,
            ..AuthConfig::with_random_secrets()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoHashPermits));

        // Zero grace just means every reuse revokes
        let config = AuthConfig {
            reuse_grace_period: Duration::ZERO,
            ..AuthConfig::with_random_secrets()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_cookie_configs_follow_token_lifetimes() {
        let config = AuthConfig {
            cookie_domain: Some("example.com".to_string()),
            ..AuthConfig::development()
        };

        let access = config.access_cookie();
        assert_eq!(access.name, "accessToken");
        assert_eq!(access.max_age_secs, Some(900));
        assert!(!access.secure);

        let refresh = config.refresh_cookie();
        assert_eq!(refresh.name, "refreshToken");
        assert_eq!(refresh.max_age_secs, Some(864_000));
        assert_eq!(refresh.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::with_random_secrets()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("pepper\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
