//! Session cookie binding
//!
//! Maps a token pair onto the `accessToken` / `refreshToken` cookies and
//! reads credentials back from a request.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::AppendHeaders;
use platform::cookie::{
    CookieConfig, delete_cookie_header, extract_bearer, extract_cookie, set_cookie_header,
};

use crate::application::config::AuthConfig;
use crate::domain::entity::session::TokenPair;
use crate::error::{AuthError, AuthResult};

pub type SetCookies = AppendHeaders<[(HeaderName, HeaderValue); 2]>;

#[derive(Debug, Clone)]
pub struct SessionCookies {
    access: CookieConfig,
    refresh: CookieConfig,
}

impl SessionCookies {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access: config.access_cookie(),
            refresh: config.refresh_cookie(),
        }
    }

    /// Both cookies, each with `Max-Age` equal to its token's lifetime
    pub fn set(&self, tokens: &TokenPair) -> AuthResult<SetCookies> {
        let access = set_cookie_header(&self.access, tokens.access_token.as_str())
            .ok_or_else(|| AuthError::Internal("access cookie is not a valid header".to_string()))?;
        let refresh = set_cookie_header(&self.refresh, tokens.refresh_token.as_str())
            .ok_or_else(|| {
                AuthError::Internal("refresh cookie is not a valid header".to_string())
            })?;

        Ok(AppendHeaders([
            (header::SET_COOKIE, access),
            (header::SET_COOKIE, refresh),
        ]))
    }

    /// Expire both cookies using the same attributes they were set with
    pub fn clear(&self) -> AuthResult<SetCookies> {
        let access = delete_cookie_header(&self.access)
            .ok_or_else(|| AuthError::Internal("access cookie is not a valid header".to_string()))?;
        let refresh = delete_cookie_header(&self.refresh).ok_or_else(|| {
            AuthError::Internal("refresh cookie is not a valid header".to_string())
        })?;

        Ok(AppendHeaders([
            (header::SET_COOKIE, access),
            (header::SET_COOKIE, refresh),
        ]))
    }

    /// Access token from the cookie, else `Authorization: Bearer`
    pub fn access_token(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.access.name).or_else(|| extract_bearer(headers))
    }

    /// Refresh token from the cookie, else the request body
    pub fn refresh_token(&self, headers: &HeaderMap, body: Option<String>) -> Option<String> {
        extract_cookie(headers, &self.refresh.name)
            .or_else(|| body.filter(|token| !token.is_empty()))
    }
}
