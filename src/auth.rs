//! Passwords, server-side sessions and the signed cookies that carry them.

use actix_web::cookie::{time, Cookie, CookieJar, Key, SameSite};
use actix_web::{
    http::header::{self, ContentType},
    HttpRequest, HttpResponse,
};
use chrono::{Duration, Utc};
use log::info;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session::{Session, SessionUser};

pub const SESSION_COOKIE: &str = "session_id";
pub const FLASH_COOKIE: &str = "flash";

/// Signing key shared through `web::Data`.
#[derive(Clone)]
pub struct CookieKey(pub Key);

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Value of a cookie whose signature checks out.
pub fn read_signed(req: &HttpRequest, key: &Key, name: &str) -> Option<String> {
    let cookie = req.cookie(name)?;
    let mut jar = CookieJar::new();
    jar.add_original(cookie);
    jar.signed(key).get(name).map(|c| c.value().to_string())
}

pub fn signed_cookie(key: &Key, name: &'static str, value: String, max_age: Option<Duration>) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    if let Some(age) = max_age {
        cookie.set_max_age(time::Duration::seconds(age.num_seconds()));
    }
    let mut jar = CookieJar::new();
    jar.signed_mut(key).add(cookie);
    jar.get(name)
        .cloned()
        .unwrap_or_else(|| Cookie::new(name, ""))
}

pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect carrying a one-shot message for the next page.
pub fn redirect_with_flash(key: &Key, location: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(signed_cookie(key, FLASH_COOKIE, message.into(), None))
        .finish()
}

/// HTML response that also expires the flash cookie once its message was shown.
pub fn flash_page(body: String, clear_flash: bool) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder.content_type(ContentType::html());
    if clear_flash {
        builder.cookie(removal_cookie(FLASH_COOKIE));
    }
    builder.body(body)
}

pub fn take_flash(req: &HttpRequest, key: &Key) -> Option<String> {
    read_signed(req, key, FLASH_COOKIE)
}

pub async fn create_session(pool: &SqlitePool, user_id: i64, ttl: Duration) -> Result<String, AppError> {
    let session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now().naive_utc() + ttl;
    sqlx::query("INSERT INTO sessions (session_id, user_id, expires_at) VALUES (?, ?, ?)")
        .bind(&session_id)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(session_id)
}

/// Expired sessions are deleted on sight.
pub async fn resolve_session(pool: &SqlitePool, session_id: &str) -> Result<Option<SessionUser>, AppError> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT session_id, user_id, expires_at FROM sessions WHERE session_id = ?",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    let session = match session {
        Some(session) => session,
        None => return Ok(None),
    };
    if session.expires_at < Utc::now().naive_utc() {
        info!("Session expired for user {}", session.user_id);
        delete_session(pool, session_id).await?;
        return Ok(None);
    }

    let user = sqlx::query_as::<_, SessionUser>("SELECT id AS user_id, username FROM users WHERE id = ?")
        .bind(session.user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn delete_session(pool: &SqlitePool, session_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE session_id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn current_user(req: &HttpRequest, pool: &SqlitePool, key: &Key) -> Result<Option<SessionUser>, AppError> {
    match read_signed(req, key, SESSION_COOKIE) {
        Some(session_id) => resolve_session(pool, &session_id).await,
        None => Ok(None),
    }
}
