use actix_web::{http::header, web, HttpRequest, HttpResponse};
use chrono::Duration;
use log::{error, info};
use sqlx::SqlitePool;

use super::login_models::{AuthPage, LoginRequest, RegisterRequest};
use crate::auth::{
    self, create_session, delete_session, flash_page, read_signed, redirect_with_flash,
    removal_cookie, signed_cookie, take_flash, CookieKey, SESSION_COOKIE,
};
use crate::config::Config;
use crate::error::AppError;
use crate::registry;
use crate::templates::Templates;

/// Renders a form page and consumes any pending flash message.
fn auth_page(
    req: &HttpRequest,
    key: &CookieKey,
    templates: &Templates,
    name: &str,
) -> Result<HttpResponse, AppError> {
    let flash = take_flash(req, &key.0);
    let body = templates.render(name, &AuthPage { flash: flash.clone() })?;
    Ok(flash_page(body, flash.is_some()))
}

pub async fn login_get(
    req: HttpRequest,
    key: web::Data<CookieKey>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    auth_page(&req, &key, &templates, "login")
}

pub async fn register_get(
    req: HttpRequest,
    key: web::Data<CookieKey>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    auth_page(&req, &key, &templates, "register")
}

// register user to DB
pub async fn register(
    pool: web::Data<SqlitePool>,
    key: web::Data<CookieKey>,
    config: web::Data<Config>,
    form: web::Form<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let username = form.username.trim().to_string();
    info!("Received request to register user: {}", username);

    if username.is_empty() || form.password.is_empty() {
        return Ok(redirect_with_flash(&key.0, "/register", "Username and password are required"));
    }
    if form.password != form.confirm {
        return Ok(redirect_with_flash(&key.0, "/register", "The passwords do not match"));
    }
    if registry::find_user_by_username(&pool, &username).await?.is_some() {
        info!("Username {} is already taken", username);
        return Ok(redirect_with_flash(&key.0, "/register", "Username already exists"));
    }

    let password = form.password.clone();
    let cost = config.bcrypt_cost;
    let hashed_password = web::block(move || auth::hash_password(&password, cost)).await??;
    let user_id = registry::create_user(&pool, &username, &hashed_password).await?;

    info!("User {} registered successfully with id {}", username, user_id);
    Ok(redirect_with_flash(&key.0, "/login", "Registration successful, please log in"))
}

// login logic
pub async fn login(
    pool: web::Data<SqlitePool>,
    key: web::Data<CookieKey>,
    config: web::Data<Config>,
    form: web::Form<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let username = form.username.trim().to_string();
    info!("Received login request for user: {}", username);

    let user = match registry::find_user_by_username(&pool, &username).await? {
        Some(user) => user,
        None => {
            info!("Invalid username: {}", username);
            return Ok(redirect_with_flash(&key.0, "/login", "Invalid username or password"));
        }
    };

    let password = form.password.clone();
    let hash = user.password_hash.clone();
    let valid = match web::block(move || auth::verify_password(&password, &hash)).await? {
        Ok(valid) => valid,
        Err(e) => {
            error!("Error when checking password for user {}: {}", username, e);
            false
        }
    };
    if !valid {
        info!("Invalid password for user: {}", username);
        return Ok(redirect_with_flash(&key.0, "/login", "Invalid username or password"));
    }

    let remember = form.remember();
    let ttl = if remember {
        Duration::days(config.remember_days)
    } else {
        Duration::minutes(config.session_minutes)
    };
    let session_id = create_session(&pool, user.id, ttl).await?;

    info!("User {} logged in successfully", username);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(signed_cookie(
            &key.0,
            SESSION_COOKIE,
            session_id,
            remember.then_some(ttl),
        ))
        .finish())
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    key: web::Data<CookieKey>,
) -> Result<HttpResponse, AppError> {
    if let Some(session_id) = read_signed(&req, &key.0, SESSION_COOKIE) {
        info!("Received logout request with session ID: {}", session_id);
        delete_session(&pool, &session_id).await?;
    }
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(removal_cookie(SESSION_COOKIE))
        .finish())
}
