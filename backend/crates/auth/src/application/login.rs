//! Login Use Case
//!
//! Authenticates a user and binds it to the client session.

use std::sync::Arc;

use platform::password::PlainPassword;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
}

impl<U, S> LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    /// Attempt a login.
    ///
    /// Unknown email and wrong password both collapse into
    /// `InvalidCredentials`; the caller learns nothing beyond "invalid".
    pub async fn execute(&self, input: LoginInput, session_id: Uuid) -> AuthResult<User> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = PlainPassword::new(input.password);
        if !user.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        self.session_repo.set_user(session_id, user.id).await?;

        tracing::info!(user_id = ?user.id, session_id = %session_id, "user logged in");

        Ok(user)
    }
}
