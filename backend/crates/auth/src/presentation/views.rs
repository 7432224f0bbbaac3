//! Page Views
//!
//! One askama template struct per rendered page.

use askama::Template;

/// GET /login
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flash: Option<String>,
}

/// GET /register
#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub flash: Option<String>,
}

/// GET /dashboard
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// GET /users/{id}
#[derive(Template)]
#[template(path = "user.html")]
pub struct ProfilePage {
    pub name: String,
    pub email: String,
    pub joined: String,
}

/// 404 page for unknown profile ids
#[derive(Template)]
#[template(path = "user_not_found.html")]
pub struct UserNotFoundPage;
