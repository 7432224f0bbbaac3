//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the infra layer.

use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user and return the store-assigned id.
    ///
    /// Fails with `EmailTaken` when the email is already registered; the
    /// storage layer's unique index backs the application-level pre-check.
    async fn insert(&self, user: &User) -> AuthResult<i64>;

    /// Find user by id
    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by id
    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Bind or clear the session's authenticated user
    async fn set_user(&self, session_id: Uuid, user_id: Option<i64>) -> AuthResult<()>;

    /// Set the pending flash message
    async fn set_flash(&self, session_id: Uuid, message: &str) -> AuthResult<()>;

    /// Read and clear the pending flash message
    async fn take_flash(&self, session_id: Uuid) -> AuthResult<Option<String>>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn delete_expired(&self) -> AuthResult<u64>;
}
