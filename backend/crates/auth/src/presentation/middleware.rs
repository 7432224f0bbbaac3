//! Session Middleware and Access Guards
//!
//! `load_session` resolves the client session once per request and stores
//! it in request extensions. The guards read that context and either let
//! the chain continue or answer with a redirect; the first failing guard's
//! redirect is the entire response.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use uuid::Uuid;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::AppState;

/// Resolved session stored in request extensions by [`load_session`]
#[derive(Clone)]
pub struct SessionContext {
    pub session: Session,
}

impl SessionContext {
    pub fn session_id(&self) -> Uuid {
        self.session.session_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Resolve (or create) the client session and expose it to the route.
///
/// Runs outside the guards. A newly created session gets its Set-Cookie
/// appended to whatever response the rest of the stack produces, including
/// guard redirects.
pub async fn load_session<R>(
    State(state): State<AppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let cookie = extract_cookie(req.headers(), &state.config.session_cookie_name);

    let opened = match state.sessions().open(cookie.as_deref()).await {
        Ok(opened) => opened,
        Err(e) => return e.into_response(),
    };

    let issued = opened.issued;
    let session_id = opened.session.session_id;

    req.extensions_mut().insert(SessionContext {
        session: opened.session,
    });

    let mut response = next.run(req).await;

    if issued {
        let token = token::sign(session_id, &state.config.session_secret);
        let cookie = build_session_cookie(&state.config, &token);

        if let Ok(value) = header::HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Authenticated-guard: passes iff the session carries a user id.
///
/// On failure the response is a redirect to the login page and the
/// protected handler never runs.
pub async fn require_auth(req: Request<Body>, next: Next) -> Response {
    let authenticated = req
        .extensions()
        .get::<SessionContext>()
        .is_some_and(SessionContext::is_authenticated);

    if authenticated {
        next.run(req).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Guest-guard: passes iff the session carries no user id.
///
/// On failure the response is a redirect to the dashboard.
pub async fn require_guest(req: Request<Body>, next: Next) -> Response {
    let authenticated = req
        .extensions()
        .get::<SessionContext>()
        .is_some_and(SessionContext::is_authenticated);

    if authenticated {
        Redirect::to("/dashboard").into_response()
    } else {
        next.run(req).await
    }
}

fn build_session_cookie(config: &AuthConfig, token: &str) -> String {
    let mut parts = vec![
        format!("{}={}", config.session_cookie_name, token),
        "HttpOnly".to_string(),
        "Path=/".to_string(),
        format!("Max-Age={}", config.session_ttl.as_secs()),
    ];

    if config.cookie_secure {
        parts.push("Secure".to_string());
    }

    parts.push(format!("SameSite={}", config.cookie_same_site.as_str()));

    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::cookie::SameSite;

    #[test]
    fn test_build_session_cookie() {
        let config = AuthConfig {
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            ..AuthConfig::default()
        };

        let cookie = build_session_cookie(&config, "token123");

        assert!(cookie.starts_with("sid=token123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains(&format!("Max-Age={}", config.session_ttl.as_secs())));
    }

    #[test]
    fn test_insecure_cookie_omits_secure() {
        let config = AuthConfig {
            cookie_secure: false,
            ..AuthConfig::default()
        };

        assert!(!build_session_cookie(&config, "t").contains("Secure"));
    }
}
