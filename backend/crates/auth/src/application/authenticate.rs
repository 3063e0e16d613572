//! Authenticate Use Case
//!
//! Access token to request context. Signature and expiry only; the store is
//! not consulted, so a logged-out client keeps access until the token
//! expires.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::token_issuer::TokenIssuer;
use crate::error::AuthResult;

pub struct AuthenticateUseCase {
    issuer: Arc<TokenIssuer>,
}

impl AuthenticateUseCase {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    pub fn execute(&self, access_token: &str) -> AuthResult<AuthContext> {
        self.issuer.authenticate(access_token)
    }
}
