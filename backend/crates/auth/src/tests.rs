//! Unit and end-to-end tests for the auth crate
//!
//! Routes, guards, and handlers are exercised in-process against the
//! router built over an in-memory repository; no database involved.

#[cfg(test)]
mod support {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tower::util::ServiceExt;
    use uuid::Uuid;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{session::Session, user::User};
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::email::Email;
    use crate::error::{AuthError, AuthResult};
    use crate::presentation::router::app_router_generic;

    /// In-memory repository double for users and sessions
    #[derive(Clone, Default)]
    pub struct MemoryRepository {
        inner: Arc<Mutex<MemoryState>>,
    }

    #[derive(Default)]
    struct MemoryState {
        users: Vec<User>,
        sessions: HashMap<Uuid, Session>,
        next_id: i64,
    }

    impl MemoryRepository {
        pub fn user_count(&self) -> usize {
            self.inner.lock().unwrap().users.len()
        }

        pub fn remove_user(&self, id: i64) {
            self.inner
                .lock()
                .unwrap()
                .users
                .retain(|u| u.id != Some(id));
        }
    }

    impl UserRepository for MemoryRepository {
        async fn insert(&self, user: &User) -> AuthResult<i64> {
            let mut state = self.inner.lock().unwrap();

            if state.users.iter().any(|u| u.email == user.email) {
                return Err(AuthError::EmailTaken);
            }

            state.next_id += 1;
            let id = state.next_id;
            state.users.push(user.clone().with_id(id));

            Ok(id)
        }

        async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
            let state = self.inner.lock().unwrap();
            Ok(state.users.iter().find(|u| u.id == Some(id)).cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            let state = self.inner.lock().unwrap();
            Ok(state.users.iter().find(|u| &u.email == email).cloned())
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            let state = self.inner.lock().unwrap();
            Ok(state.users.iter().any(|u| &u.email == email))
        }
    }

    impl SessionRepository for MemoryRepository {
        async fn create(&self, session: &Session) -> AuthResult<()> {
            self.inner
                .lock()
                .unwrap()
                .sessions
                .insert(session.session_id, session.clone());
            Ok(())
        }

        async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .sessions
                .get(&session_id)
                .cloned())
        }

        async fn set_user(&self, session_id: Uuid, user_id: Option<i64>) -> AuthResult<()> {
            if let Some(session) = self.inner.lock().unwrap().sessions.get_mut(&session_id) {
                session.user_id = user_id;
            }
            Ok(())
        }

        async fn set_flash(&self, session_id: Uuid, message: &str) -> AuthResult<()> {
            if let Some(session) = self.inner.lock().unwrap().sessions.get_mut(&session_id) {
                session.flash_error = Some(message.to_string());
            }
            Ok(())
        }

        async fn take_flash(&self, session_id: Uuid) -> AuthResult<Option<String>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .sessions
                .get_mut(&session_id)
                .and_then(|s| s.flash_error.take()))
        }

        async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
            self.inner.lock().unwrap().sessions.remove(&session_id);
            Ok(())
        }

        async fn delete_expired(&self) -> AuthResult<u64> {
            let mut state = self.inner.lock().unwrap();
            let before = state.sessions.len();
            state.sessions.retain(|_, s| !s.is_expired());
            Ok((before - state.sessions.len()) as u64)
        }
    }

    pub fn app() -> Router {
        app_with(MemoryRepository::default())
    }

    pub fn app_with(repo: MemoryRepository) -> Router {
        app_router_generic(repo, AuthConfig::development())
    }

    pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        app.clone().oneshot(req).await.unwrap()
    }

    pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(path);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        builder.body(Body::empty()).unwrap()
    }

    pub fn post_form(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        builder.body(Body::from(body.to_string())).unwrap()
    }

    /// The `name=value` pair from the response's Set-Cookie header
    pub fn session_cookie(response: &Response<Body>) -> Option<String> {
        let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        value.split(';').next().map(|pair| pair.trim().to_string())
    }

    pub fn location<'a>(response: &'a Response<Body>) -> Option<&'a str> {
        response.headers().get(header::LOCATION)?.to_str().ok()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Register a user and return the authenticated session cookie
    pub async fn register_user(app: &Router, name: &str, email: &str, password: &str) -> String {
        let body = format!("name={name}&email={email}&password={password}");
        let response = send(app, post_form("/register", &body, None)).await;

        assert_eq!(location(&response), Some("/dashboard"));
        session_cookie(&response).expect("register should issue a session cookie")
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_root_redirects_to_login() {
        let app = app();

        let response = send(&app, get("/", None)).await;
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_unresolved_route_is_fixed_404() {
        let app = app();

        let response = send(&app, get("/nope", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "404 Not Found");
    }

    #[tokio::test]
    async fn test_wrong_method_is_unresolved() {
        let app = app();

        // /logout is only registered for POST
        let response = send(&app, get("/logout", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "404 Not Found");
    }

    #[tokio::test]
    async fn test_user_route_matches_single_segment_only() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let response = send(&app, get("/users/42/extra", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "404 Not Found");

        let response = send(&app, get("/users/", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_route_binds_id_segment() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let response = send(&app, get("/users/1", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("Ann"));
        assert!(body.contains("ann@x.com"));
    }

    #[tokio::test]
    async fn test_non_numeric_user_id_is_not_found() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let response = send(&app, get("/users/abc", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("User not found"));
    }
}

#[cfg(test)]
mod guard_tests {
    use super::support::*;

    #[tokio::test]
    async fn test_protected_routes_redirect_guests_to_login() {
        let app = app();

        for path in ["/dashboard", "/users/1"] {
            let response = send(&app, get(path, None)).await;
            assert!(response.status().is_redirection(), "{path}");
            assert_eq!(location(&response), Some("/login"), "{path}");
        }

        let response = send(&app, post_form("/logout", "", None)).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_guest_routes_redirect_authenticated_to_dashboard() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        for path in ["/login", "/register"] {
            let response = send(&app, get(path, Some(&cookie))).await;
            assert!(response.status().is_redirection(), "{path}");
            assert_eq!(location(&response), Some("/dashboard"), "{path}");
        }
    }

    #[tokio::test]
    async fn test_failing_guard_skips_the_handler() {
        let repo = MemoryRepository::default();
        let app = app_with(repo.clone());
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        // A signed-in client posting a brand new registration is stopped by
        // the guest guard; no second user may appear.
        let body = "name=Bob&email=bob@x.com&password=longenough";
        let response = send(&app, post_form("/register", body, Some(&cookie))).await;

        assert_eq!(location(&response), Some("/dashboard"));
        assert_eq!(repo.user_count(), 1);
    }
}

#[cfg(test)]
mod registration_tests {
    use super::support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_register_persists_and_signs_in() {
        let repo = MemoryRepository::default();
        let app = app_with(repo.clone());

        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;
        assert_eq!(repo.user_count(), 1);

        let response = send(&app, get("/dashboard", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("Welcome, Ann!"));
        assert!(body.contains("ann@x.com"));
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_store_unchanged() {
        let repo = MemoryRepository::default();
        let app = app_with(repo.clone());
        register_user(&app, "Ann", "ann@x.com", "longenough").await;

        // A different client tries the same email
        let body = "name=Other&email=ann@x.com&password=longenough";
        let response = send(&app, post_form("/register", body, None)).await;

        assert_eq!(location(&response), Some("/register"));
        assert_eq!(repo.user_count(), 1);

        let cookie = session_cookie(&response).unwrap();
        let response = send(&app, get("/register", Some(&cookie))).await;
        assert!(body_text(response).await.contains("Email is already registered."));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let repo = MemoryRepository::default();
        let app = app_with(repo.clone());

        let body = "name=Ann&email=ann@x.com&password=short";
        let response = send(&app, post_form("/register", body, None)).await;

        assert_eq!(location(&response), Some("/register"));
        assert_eq!(repo.user_count(), 0);

        let cookie = session_cookie(&response).unwrap();
        let response = send(&app, get("/register", Some(&cookie))).await;
        assert!(body_text(response).await.contains("Must be at least 8 characters."));
    }

    #[tokio::test]
    async fn test_first_violation_in_declaration_order_is_flashed() {
        let app = app();

        // Both name and email are invalid; name is declared first.
        let body = "name=&email=not-an-email&password=longenough";
        let response = send(&app, post_form("/register", body, None)).await;

        assert_eq!(location(&response), Some("/register"));

        let cookie = session_cookie(&response).unwrap();
        let response = send(&app, get("/register", Some(&cookie))).await;
        assert!(body_text(response).await.contains("This field is required."));
    }
}

#[cfg(test)]
mod login_tests {
    use super::support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_login_with_correct_credentials() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        // Sign out, then sign back in over the same session
        send(&app, post_form("/logout", "", Some(&cookie))).await;

        let body = "email=ann@x.com&password=longenough";
        let response = send(&app, post_form("/login", body, Some(&cookie))).await;
        assert_eq!(location(&response), Some("/dashboard"));

        let response = send(&app, get("/dashboard", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_password_flashes_generic_message() {
        let app = app();
        register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let body = "email=ann@x.com&password=wrongwrong";
        let response = send(&app, post_form("/login", body, None)).await;
        assert_eq!(location(&response), Some("/login"));

        let cookie = session_cookie(&response).unwrap();
        let response = send(&app, get("/login", Some(&cookie))).await;
        assert!(body_text(response).await.contains("Invalid email or password."));
    }

    #[tokio::test]
    async fn test_unknown_email_flashes_the_same_message() {
        let app = app();

        let body = "email=nobody@x.com&password=whatever1";
        let response = send(&app, post_form("/login", body, None)).await;
        assert_eq!(location(&response), Some("/login"));

        let cookie = session_cookie(&response).unwrap();
        let response = send(&app, get("/login", Some(&cookie))).await;
        assert!(body_text(response).await.contains("Invalid email or password."));
    }

    #[tokio::test]
    async fn test_flash_message_is_single_use() {
        let app = app();

        let response = send(
            &app,
            post_form("/login", "email=nobody@x.com&password=whatever1", None),
        )
        .await;
        let cookie = session_cookie(&response).unwrap();

        let first = send(&app, get("/login", Some(&cookie))).await;
        assert!(body_text(first).await.contains("Invalid email or password."));

        let second = send(&app, get("/login", Some(&cookie))).await;
        assert!(!body_text(second).await.contains("Invalid email or password."));
    }

    #[tokio::test]
    async fn test_missing_fields_flash_validation_error() {
        let app = app();

        let response = send(&app, post_form("/login", "email=&password=", None)).await;
        assert_eq!(location(&response), Some("/login"));

        let cookie = session_cookie(&response).unwrap();
        let response = send(&app, get("/login", Some(&cookie))).await;
        assert!(body_text(response).await.contains("This field is required."));
    }
}

#[cfg(test)]
mod session_tests {
    use super::support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_logout_clears_the_session() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
        assert_eq!(location(&response), Some("/login"));

        // The same cookie no longer opens the dashboard
        let response = send(&app, get("/dashboard", Some(&cookie))).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_treated_as_guest() {
        let app = app();
        register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let response = send(&app, get("/dashboard", Some("sid=forged-token"))).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_dangling_user_binding_redirects_to_login() {
        let repo = MemoryRepository::default();
        let app = app_with(repo.clone());
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        repo.remove_user(1);

        let response = send(&app, get("/dashboard", Some(&cookie))).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_profile_lookup_for_unknown_id_is_404() {
        let app = app();
        let cookie = register_user(&app, "Ann", "ann@x.com", "longenough").await;

        let response = send(&app, get("/users/999", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("User not found"));
    }

    #[tokio::test]
    async fn test_any_authenticated_user_may_view_any_profile() {
        let app = app();
        register_user(&app, "Ann", "ann@x.com", "longenough").await;
        let bob = register_user(&app, "Bob", "bob@x.com", "longenough").await;

        let response = send(&app, get("/users/1", Some(&bob))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Ann"));
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.session_cookie_name, "sid");
        assert_eq!(config.session_ttl, Duration::from_secs(12 * 3600));
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
    }

    #[test]
    fn test_with_random_secret() {
        let first = AuthConfig::with_random_secret();
        let second = AuthConfig::with_random_secret();

        assert_ne!(first.session_secret, second.session_secret);
        assert!(first.session_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();

        assert!(!config.cookie_secure);
        assert!(config.session_secret.iter().any(|&b| b != 0));
    }
}
