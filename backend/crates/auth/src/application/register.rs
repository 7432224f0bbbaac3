//! Register Use Case
//!
//! Creates a new user account and binds it to the client session.

use std::sync::Arc;

use platform::password::PlainPassword;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
}

impl<U, S> RegisterUseCase<U, S>
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

    /// Register a new user and establish an authenticated session.
    ///
    /// The availability pre-check and the insert are a read-then-write
    /// pair; the unique index on email backs it, so a concurrent duplicate
    /// registration still surfaces as `EmailTaken`.
    pub async fn execute(&self, input: RegisterInput, session_id: Uuid) -> AuthResult<User> {
        let email = Email::new(input.email)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = PlainPassword::new(input.password).hash()?;
        let user = User::new(input.name, email, password_hash);

        let id = self.user_repo.insert(&user).await?;
        let user = user.with_id(id);

        self.session_repo.set_user(session_id, user.id).await?;

        tracing::info!(user_id = id, session_id = %session_id, "user registered");

        Ok(user)
    }
}
