use log::info;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::models::task::default_tasks;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_by INTEGER REFERENCES users (id),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY,
        project_id INTEGER NOT NULL REFERENCES projects (id),
        task TEXT NOT NULL,
        start_date TEXT NOT NULL,
        finish_date TEXT NOT NULL,
        resource TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        session_id TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users (id),
        expires_at TEXT NOT NULL
    )",
];

pub const DEFAULT_PROJECT_NAME: &str = "Default Project";
const DEFAULT_PROJECT_DESCRIPTION: &str = "An example project showing the Gantt chart";

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Creates missing tables; an empty database also gets the shared default project.
pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    let (projects,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(pool)
        .await?;
    if projects > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let project_id = sqlx::query(
        "INSERT INTO projects (name, description, created_by) VALUES (?, ?, NULL)",
    )
    .bind(DEFAULT_PROJECT_NAME)
    .bind(DEFAULT_PROJECT_DESCRIPTION)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for task in default_tasks() {
        sqlx::query(
            "INSERT INTO tasks (project_id, task, start_date, finish_date, resource)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(&task.name)
        .bind(task.start)
        .bind(task.finish)
        .bind(&task.resource)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!("Seeded default project {} with the example plan", project_id);
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // one connection, otherwise every pooled connection opens its own empty database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_db(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_db_seeds_once() {
        let pool = memory_pool().await;
        init_db(&pool).await.unwrap();

        let (projects,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(&pool)
            .await
            .unwrap();
        let (tasks,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(projects, 1);
        assert_eq!(tasks, 5);
    }
}
