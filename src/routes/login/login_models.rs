use serde::{Deserialize, Serialize};

// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
}


// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub remember_me: Option<String>,
}

impl LoginRequest {
    pub fn remember(&self) -> bool {
        matches!(self.remember_me.as_deref(), Some("on" | "true" | "1"))
    }
}


// Page model shared by the login and register forms
#[derive(Serialize)]
pub struct AuthPage {
    pub flash: Option<String>,
}
