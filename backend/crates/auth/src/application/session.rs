//! Session Use Case
//!
//! Resolves the per-client session for a request and owns the operations
//! that read or mutate it: current-user lookup, flash messages, sign-out.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

/// Result of [`SessionUseCase::open`]
pub struct OpenedSession {
    pub session: Session,
    /// True when a fresh session was created and a cookie must be issued
    pub issued: bool,
}

/// Session use case
pub struct SessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Resolve the request's session, creating an anonymous one when the
    /// cookie is absent, unverifiable, or points at a dead session.
    pub async fn open(&self, cookie_token: Option<&str>) -> AuthResult<OpenedSession> {
        if let Some(token) = cookie_token {
            if let Some(session_id) = token::verify(token, &self.config.session_secret) {
                if let Some(session) = self.session_repo.find_by_id(session_id).await? {
                    if session.is_expired() {
                        self.session_repo.delete(session_id).await?;
                    } else {
                        return Ok(OpenedSession {
                            session,
                            issued: false,
                        });
                    }
                }
            }
        }

        let session = Session::anonymous(self.config.session_ttl);
        self.session_repo.create(&session).await?;

        tracing::debug!(session_id = %session.session_id, "session created");

        Ok(OpenedSession {
            session,
            issued: true,
        })
    }

    /// The session's authenticated user, if the binding still resolves
    pub async fn current_user(&self, session: &Session) -> AuthResult<Option<User>> {
        match session.user_id {
            Some(id) => self.user_repo.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Direct lookup by id, no session involvement
    pub async fn find_user(&self, id: i64) -> AuthResult<Option<User>> {
        self.user_repo.find_by_id(id).await
    }

    /// Clear the session's user binding. Idempotent.
    pub async fn sign_out(&self, session_id: Uuid) -> AuthResult<()> {
        self.session_repo.set_user(session_id, None).await?;

        tracing::info!(session_id = %session_id, "user signed out");

        Ok(())
    }

    /// Store a flash message for the next rendered page
    pub async fn set_flash(&self, session_id: Uuid, message: &str) -> AuthResult<()> {
        self.session_repo.set_flash(session_id, message).await
    }

    /// Read and clear the pending flash message
    pub async fn take_flash(&self, session_id: Uuid) -> AuthResult<Option<String>> {
        self.session_repo.take_flash(session_id).await
    }
}
