//! Auth Middleware
//!
//! Turns the request's access token into an [`AuthContext`] request
//! extension for protected handlers.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthenticateUseCase;
use crate::domain::repository::AccountStore;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid access token
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AccountStore,
{
    let token = state
        .cookies
        .access_token(req.headers())
        .ok_or(AuthError::InvalidToken)?;

    let context = AuthenticateUseCase::new(state.issuer.clone()).execute(&token)?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
