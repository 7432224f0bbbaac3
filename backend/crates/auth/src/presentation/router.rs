//! Route Table
//!
//! The closed set of route-to-handler bindings, resolved at startup. Each
//! route carries its guard as a route layer; the session middleware wraps
//! the whole table so guards and handlers see the same resolved session.

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AppState};
use crate::presentation::middleware::{load_session, require_auth, require_guest};

/// Create the application router with the PostgreSQL repository
pub fn app_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    app_router_generic(repo, config)
}

/// Create the application router for any repository implementation
pub fn app_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let guest = Router::new()
        .route(
            "/login",
            get(handlers::show_login::<R>).post(handlers::login::<R>),
        )
        .route(
            "/register",
            get(handlers::show_register::<R>).post(handlers::register::<R>),
        )
        .route_layer(from_fn(require_guest));

    let protected = Router::new()
        .route("/dashboard", get(handlers::dashboard::<R>))
        .route("/users/{id}", get(handlers::show_user::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/", get(handlers::index))
        .merge(guest)
        .merge(protected)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), load_session::<R>))
        .with_state(state)
}
