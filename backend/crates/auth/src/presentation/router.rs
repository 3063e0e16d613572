//! Auth Router

use axum::{Router, middleware, routing::post};

use crate::application::config::AuthConfig;
use crate::domain::repository::AccountStore;
use crate::infra::postgres::PgAccountStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the Auth router with PostgreSQL store
pub fn auth_router(repo: PgAccountStore, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any store implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AccountStore,
{
    let state = AuthAppState::new(repo, config);

    let protected = Router::new()
        .route("/logout", post(handlers::logout::<R>))
        .route("/change-password", post(handlers::change_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .merge(protected)
        .with_state(state)
}
