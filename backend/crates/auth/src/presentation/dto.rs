//! Form DTOs
//!
//! Fields default to the empty string so an absent key reaches the
//! validator as an empty value instead of failing extraction.

use serde::Deserialize;

/// POST /login body
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /register body
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
