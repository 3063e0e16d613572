//! HTTP Handlers

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::application::{
    AuthConfig, AuthContext, ChangePasswordInput, ChangePasswordUseCase, CredentialVerifier,
    RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
    TokenIssuer,
};
use crate::domain::repository::AccountStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::cookies::SessionCookies;
use crate::presentation::dto::{
    AccountSummaryResponse, ChangePasswordRequest, RefreshRequest, SignInRequest, SignInResponse,
    SignUpRequest, TokenResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: CredentialVerifier,
    pub cookies: Arc<SessionCookies>,
}

impl<R> AuthAppState<R>
where
    R: AccountStore,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            issuer: Arc::new(TokenIssuer::new(&config)),
            verifier: CredentialVerifier::new(&config),
            cookies: Arc::new(SessionCookies::new(&config)),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<AccountSummaryResponse>)>
where
    R: AccountStore,
{
    let Json(req) = body?;
    let use_case = SignUpUseCase::new(state.repo.clone(), state.verifier.clone());

    let summary = use_case
        .execute(SignUpInput {
            user_name: req.user_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(summary.into())))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore,
{
    let Json(req) = body?;
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.verifier.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            identifier: req.identifier,
            password: req.password,
        })
        .await?;

    let cookies = state.cookies.set(&output.tokens)?;

    Ok((
        StatusCode::OK,
        cookies,
        Json(SignInResponse {
            tokens: output.tokens.into(),
            account: output.account.into(),
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
///
/// Any unauthorized-class failure also expires both cookies so the client
/// stops retrying with a dead session.
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: AccountStore,
{
    match refresh_inner(&state, &headers, &body).await {
        Ok(response) => response,
        Err(err) if err.is_unauthorized() => match state.cookies.clear() {
            Ok(clear) => (clear, err).into_response(),
            Err(cookie_err) => cookie_err.into_response(),
        },
        Err(err) => err.into_response(),
    }
}

async fn refresh_inner<R>(
    state: &AuthAppState<R>,
    headers: &HeaderMap,
    body: &[u8],
) -> AuthResult<Response>
where
    R: AccountStore,
{
    let req = if body.is_empty() {
        RefreshRequest::default()
    } else {
        serde_json::from_slice::<RefreshRequest>(body)
            .map_err(|_| AuthError::Validation("Invalid JSON body".to_string()))?
    };

    let presented = state
        .cookies
        .refresh_token(headers, req.refresh_token)
        .ok_or(AuthError::InvalidToken)?;

    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(&presented).await?;

    let cookies = state.cookies.set(&output.tokens)?;

    Ok((
        StatusCode::OK,
        cookies,
        Json(TokenResponse::from(output.tokens)),
    )
        .into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Extension(context): Extension<AuthContext>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountStore,
{
    SignOutUseCase::new(state.repo.clone())
        .execute(&context)
        .await?;

    Ok((StatusCode::NO_CONTENT, state.cookies.clear()?))
}

// ============================================================================
// Change Password
// ============================================================================

/// POST /api/auth/change-password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(context): Extension<AuthContext>,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    R: AccountStore,
{
    let Json(req) = body?;
    let use_case = ChangePasswordUseCase::new(
        state.repo.clone(),
        state.verifier.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            &context,
            ChangePasswordInput {
                old_password: req.old_password,
                new_password: req.new_password,
            },
        )
        .await?;

    if output.sessions_revoked {
        return Ok((StatusCode::NO_CONTENT, state.cookies.clear()?).into_response());
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
