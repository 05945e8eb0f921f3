// src/routes.rs

pub mod routes;

pub mod board {
    pub mod board_handlers;
    pub mod board_models;
}

pub mod login {
    pub mod login_handlers;
    pub mod login_models;
}

pub mod project_view {
    pub mod project_view_handlers;
    pub mod project_view_models;
}

use actix_web::web;
use serde::Serialize;

use crate::chart::ChartGenerator;
use crate::error::AppError;
use crate::models::task::Task;

/// A task as listed on a page, with the index the forms post back.
#[derive(Serialize)]
pub struct TaskView {
    pub index: usize,
    pub name: String,
    pub start: String,
    pub finish: String,
    pub resource: String,
}

pub fn task_views(tasks: &[Task]) -> Vec<TaskView> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskView {
            index,
            name: task.name.clone(),
            start: task.start.to_string(),
            finish: task.finish.to_string(),
            resource: task.resource.clone(),
        })
        .collect()
}

#[derive(Serialize)]
pub struct ChartView {
    pub image_url: String,
    pub document_url: String,
}

impl ChartView {
    pub fn for_key(key: &str) -> Self {
        // artifacts are rewritten in place, so bust browser caches
        let version = chrono::Utc::now().timestamp_millis();
        ChartView {
            image_url: format!("/static/{key}.png?v={version}"),
            document_url: format!("/static/{key}.html?v={version}"),
        }
    }
}

/// Rebuilds the chart for `key` on the blocking pool.
pub async fn refresh_chart(
    charts: &web::Data<ChartGenerator>,
    tasks: Vec<Task>,
    key: String,
) -> Result<bool, AppError> {
    let charts = charts.clone();
    let artifacts = web::block(move || charts.refresh(&tasks, &key)).await??;
    Ok(artifacts.is_some())
}

/// Draws a missing chart; returns whether one is available afterwards.
pub async fn ensure_chart(
    charts: &web::Data<ChartGenerator>,
    tasks: &[Task],
    key: &str,
) -> Result<bool, AppError> {
    if charts.exists(key) {
        return Ok(true);
    }
    if tasks.is_empty() {
        return Ok(false);
    }
    refresh_chart(charts, tasks.to_vec(), key.to_string()).await
}

/// Task indices arrive as form text; only plain digits are accepted.
pub fn parse_index(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_accepts_digits_only() {
        assert_eq!(parse_index(Some("0")), Some(0));
        assert_eq!(parse_index(Some(" 12 ")), Some(12));
        assert_eq!(parse_index(Some("-1")), None);
        assert_eq!(parse_index(Some("1e3")), None);
        assert_eq!(parse_index(Some("")), None);
        assert_eq!(parse_index(None), None);
    }
}
