//! Session Entity
//!
//! Per-client server-side state, referenced by a signed cookie token.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Per-client session.
///
/// Holds at most one authenticated user id and at most one pending flash
/// message. The row outlives logout: clearing the user binding keeps the
/// session alive so a flash set by the next action still has a home.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Authenticated user, `None` for guests
    pub user_id: Option<i64>,
    /// Pending single-use flash message
    pub flash_error: Option<String>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh anonymous session.
    ///
    /// TTL is provided by the application layer (config), not hard-coded.
    pub fn anonymous(ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id: None,
            flash_error: None,
            expires_at_ms: now.timestamp_millis() + ttl.as_millis() as i64,
            created_at: now,
        }
    }

    /// Check whether the session carries a user id
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}
