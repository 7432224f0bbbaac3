//! User Entity

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::email::Email;

/// User identity record.
///
/// Immutable once constructed. The id is assigned by the store, so a value
/// built with [`User::new`] carries `None` until [`User::with_id`] produces
/// the enriched instance after persistence.
#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned id, present only after persistence
    pub id: Option<i64>,
    /// Display name
    pub name: String,
    /// Login email, unique across all users
    pub email: Email,
    /// PHC-formatted password hash, never the raw password
    pub password_hash: HashedPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not-yet-persisted user
    pub fn new(name: String, email: Email, password_hash: HashedPassword) -> Self {
        Self {
            id: None,
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Produce a new instance enriched with the store-assigned id
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}
