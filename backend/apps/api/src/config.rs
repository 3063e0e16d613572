//! Server configuration from the environment

use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    /// Build from any key lookup. `development` allows missing secrets
    /// (random per process) and defaults cookies to non-Secure.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        development: bool,
    ) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut auth = if development {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };

        if let Some(secret) = secret(&lookup, "ACCESS_TOKEN_SECRET", development)? {
            auth.access_token_secret = secret;
        }
        if let Some(secret) = secret(&lookup, "REFRESH_TOKEN_SECRET", development)? {
            auth.refresh_token_secret = secret;
        }

        if let Some(secs) = parse(&lookup, "ACCESS_TOKEN_EXPIRY_SECS")? {
            auth.access_token_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse(&lookup, "REFRESH_TOKEN_EXPIRY_SECS")? {
            auth.refresh_token_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = parse(&lookup, "STORE_TIMEOUT_MS")? {
            auth.store_timeout = Duration::from_millis(ms);
        }

        if let Some(pepper) = lookup("PASSWORD_PEPPER").filter(|p| !p.is_empty()) {
            auth.password_pepper = Some(pepper.into_bytes());
        }
        if let Some(secure) = parse(&lookup, "COOKIE_SECURE")? {
            auth.cookie_secure = secure;
        }
        auth.cookie_domain = lookup("COOKIE_DOMAIN").filter(|d| !d.is_empty());

        if let Some(revoke) = parse(&lookup, "REVOKE_SESSIONS_ON_PASSWORD_CHANGE")? {
            auth.revoke_sessions_on_password_change = revoke;
        }
        if let Some(revoke) = parse(&lookup, "REVOKE_ON_TOKEN_REUSE")? {
            auth.revoke_on_token_reuse = revoke;
        }
        if let Some(secs) = parse(&lookup, "REUSE_GRACE_SECS")? {
            auth.reuse_grace_period = Duration::from_secs(secs);
        }

        auth.validate().context("invalid auth configuration")?;

        Ok(Self {
            database_url,
            port,
            max_connections,
            frontend_origins,
            auth,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {raw:?}"))
        })
        .transpose()
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse(lookup, key)?.unwrap_or(default))
}

/// Base64-encoded 32-byte secret. Missing is fine in development only.
fn secret(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    development: bool,
) -> anyhow::Result<Option<[u8; 32]>> {
    let Some(encoded) = lookup(key) else {
        if development {
            tracing::warn!("{key} not set, using a random secret for this process");
            return Ok(None);
        }
        bail!("{key} must be set in production");
    };

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .with_context(|| format!("{key} is not valid base64"))?;

    let secret: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("{key} must decode to 32 bytes, got {}", b.len()))?;

    Ok(Some(secret))
}
