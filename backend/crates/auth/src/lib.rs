//! Auth Web Application Core
//!
//! Clean Architecture structure:
//! - `domain/` - entities, value objects, repository traits
//! - `application/` - use cases and configuration
//! - `infra/` - database implementations
//! - `presentation/` - route table, guards, handlers, views
//!
//! ## Features
//! - User registration and login with email + password
//! - Server-side sessions referenced by HMAC-signed cookie tokens
//! - Guest/authenticated route guards with redirect semantics
//! - Single-use flash messages for form round-trips
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified in constant time
//! - Login failures are indistinguishable (no account enumeration)
//! - Email uniqueness enforced by the storage layer, not just the
//!   application-level pre-check

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::{SessionRepository, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{app_router, app_router_generic};
