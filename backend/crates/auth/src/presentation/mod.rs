//! Presentation Layer
//!
//! Route table, access guards, HTTP handlers, form DTOs, and page views.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod views;

pub use handlers::AppState;
pub use middleware::{SessionContext, load_session, require_auth, require_guest};
pub use router::{app_router, app_router_generic};
