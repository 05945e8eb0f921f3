use log::info;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::task::{Task, TaskRow};

/// Per-project task lists. Position `i` is the `i`-th row of the project in
/// row-id order; each mutation is a single committed statement.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteTaskStore { pool }
    }

    pub async fn load(&self, project_id: i64) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, project_id, task, start_date, finish_date, resource
             FROM tasks WHERE project_id = ? ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TaskRow::into_task).collect())
    }

    pub async fn append(&self, project_id: i64, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tasks (project_id, task, start_date, finish_date, resource)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(&task.name)
        .bind(task.start)
        .bind(task.finish)
        .bind(&task.resource)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn replace_at(&self, project_id: i64, index: usize, task: &Task) -> Result<(), AppError> {
        let task_id = self.task_id_at(project_id, index).await?;
        sqlx::query(
            "UPDATE tasks SET task = ?, start_date = ?, finish_date = ?, resource = ? WHERE id = ?",
        )
        .bind(&task.name)
        .bind(task.start)
        .bind(task.finish)
        .bind(&task.resource)
        .bind(task_id)
        .execute(&self.pool)
        .await?;
        info!("Updated task {} (position {}) in project {}", task_id, index, project_id);
        Ok(())
    }

    pub async fn remove_at(&self, project_id: i64, index: usize) -> Result<(), AppError> {
        let task_id = self.task_id_at(project_id, index).await?;
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        info!("Deleted task {} (position {}) from project {}", task_id, index, project_id);
        Ok(())
    }

    async fn task_id_at(&self, project_id: i64, index: usize) -> Result<i64, AppError> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM tasks WHERE project_id = ? ORDER BY id")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        ids.get(index)
            .map(|(id,)| *id)
            .ok_or(AppError::IndexOutOfRange {
                index,
                len: ids.len(),
            })
    }
}
