//! Users and projects of the multi-user variant.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::project::Project;
use crate::models::user::User;

pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create_user(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<i64, AppError> {
    let id = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<Project>, AppError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT id, name, description, created_by, created_at FROM projects ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(projects)
}

pub async fn find_project(pool: &SqlitePool, project_id: i64) -> Result<Option<Project>, AppError> {
    let project = sqlx::query_as::<_, Project>(
        "SELECT id, name, description, created_by, created_at FROM projects WHERE id = ?",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;
    Ok(project)
}

pub async fn create_project(
    pool: &SqlitePool,
    name: &str,
    description: &str,
    user_id: i64,
) -> Result<i64, AppError> {
    let id = sqlx::query("INSERT INTO projects (name, description, created_by) VALUES (?, ?, ?)")
        .bind(name)
        .bind(description)
        .bind(user_id)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}
