//! HTTP Handlers

use askama::Template;
use axum::Extension;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::collections::HashMap;
use std::sync::Arc;

use platform::forms;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, SessionUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginForm, RegisterForm};
use crate::presentation::middleware::SessionContext;
use crate::presentation::views::{DashboardPage, LoginPage, ProfilePage, RegisterPage};

/// Shared state for handlers and middleware
#[derive(Clone)]
pub struct AppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub(crate) fn sessions(&self) -> SessionUseCase<R, R> {
        SessionUseCase::new(self.repo.clone(), self.repo.clone(), self.config.clone())
    }
}

// ============================================================================
// Pages
// ============================================================================

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/login")
}

/// GET /login
pub async fn show_login<R>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> AuthResult<Html<String>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let flash = state.sessions().take_flash(ctx.session_id()).await?;

    let page = LoginPage { flash };
    Ok(Html(page.render()?))
}

/// GET /register
pub async fn show_register<R>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> AuthResult<Html<String>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let flash = state.sessions().take_flash(ctx.session_id()).await?;

    let page = RegisterPage { flash };
    Ok(Html(page.render()?))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<LoginForm>,
) -> AuthResult<Redirect>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let input = HashMap::from([
        ("email", form.email.as_str()),
        ("password", form.password.as_str()),
    ]);
    let errors = forms::validate(
        &input,
        &[("email", "required|email"), ("password", "required")],
    );

    if let Some(message) = errors.first() {
        state.sessions().set_flash(ctx.session_id(), message).await?;
        return Ok(Redirect::to("/login"));
    }

    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone());

    let input = LoginInput {
        email: form.email,
        password: form.password,
    };

    match use_case.execute(input, ctx.session_id()).await {
        Ok(_) => Ok(Redirect::to("/dashboard")),
        Err(err @ AuthError::InvalidCredentials) => {
            state
                .sessions()
                .set_flash(ctx.session_id(), &err.to_string())
                .await?;
            Ok(Redirect::to("/login"))
        }
        Err(other) => Err(other),
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<RegisterForm>,
) -> AuthResult<Redirect>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let input = HashMap::from([
        ("name", form.name.as_str()),
        ("email", form.email.as_str()),
        ("password", form.password.as_str()),
    ]);
    let errors = forms::validate(
        &input,
        &[
            ("name", "required"),
            ("email", "required|email"),
            ("password", "required|min:8"),
        ],
    );

    if let Some(message) = errors.first() {
        state.sessions().set_flash(ctx.session_id(), message).await?;
        return Ok(Redirect::to("/register"));
    }

    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone());

    let input = RegisterInput {
        name: form.name.trim().to_string(),
        email: form.email,
        password: form.password,
    };

    match use_case.execute(input, ctx.session_id()).await {
        Ok(_) => Ok(Redirect::to("/dashboard")),
        Err(err @ AuthError::EmailTaken) => {
            state
                .sessions()
                .set_flash(ctx.session_id(), &err.to_string())
                .await?;
            Ok(Redirect::to("/register"))
        }
        Err(other) => Err(other),
    }
}

// ============================================================================
// Dashboard / Profile
// ============================================================================

/// GET /dashboard
pub async fn dashboard<R>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    // The guard already vetted the session, but the bound user may have
    // vanished from the store; treat that as not signed in.
    let Some(user) = state.sessions().current_user(&ctx.session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let page = DashboardPage {
        id: user.id.unwrap_or_default(),
        name: user.name,
        email: user.email.to_string(),
    };

    Ok(Html(page.render()?).into_response())
}

/// GET /users/{id}
///
/// Any authenticated user may view any profile by id; there is no
/// ownership check.
pub async fn show_user<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Html<String>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let user = match id.parse::<i64>() {
        Ok(id) => state.sessions().find_user(id).await?,
        Err(_) => None,
    };

    let user = user.ok_or(AuthError::UserNotFound)?;

    let page = ProfilePage {
        name: user.name,
        email: user.email.to_string(),
        joined: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    };

    Ok(Html(page.render()?))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout
pub async fn logout<R>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> AuthResult<Redirect>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    state.sessions().sign_out(ctx.session_id()).await?;

    Ok(Redirect::to("/login"))
}

// ============================================================================
// Fallback
// ============================================================================

/// Unresolved routes get a fixed plain-text 404.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
