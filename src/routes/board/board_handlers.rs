use actix_web::{web, HttpResponse};
use log::{info, warn};

use super::board_models::{
    BoardPage, DeleteTaskRequest, ReplaceTasksResponse, TasksPayload, UpdateTaskRequest,
};
use crate::chart::{ChartGenerator, CHART_TITLE};
use crate::config::Config;
use crate::error::AppError;
use crate::auth::redirect;
use crate::routes::{ensure_chart, parse_index, refresh_chart, task_views, ChartView};
use crate::store::JsonTaskStore;
use crate::templates::Templates;
use crate::validator::{validate, validate_task, TaskFields};

// Board page: task table, forms and the current chart
pub async fn index(
    store: web::Data<JsonTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    let key = &config.chart_prefix;
    let (tasks, modified) = {
        let store = store.clone();
        web::block(move || -> Result<_, AppError> { Ok((store.load()?, store.modified()?)) }).await??
    };
    // the file may have changed after the last drawing (failed render, crash after save)
    let has_chart = match modified {
        Some(modified) if charts.is_stale(key, modified) => {
            info!("Chart {} is older than the task file, redrawing", key);
            refresh_chart(&charts, tasks.clone(), key.clone()).await?
        }
        _ => ensure_chart(&charts, &tasks, key).await?,
    };

    templates.page(
        "board",
        &BoardPage {
            tasks: task_views(&tasks),
            chart: has_chart.then(|| ChartView::for_key(key)),
            chart_title: CHART_TITLE,
        },
    )
}

pub async fn get_tasks(store: web::Data<JsonTaskStore>) -> Result<HttpResponse, AppError> {
    let tasks = web::block(move || store.load()).await??;
    Ok(HttpResponse::Ok().json(TasksPayload { tasks }))
}

// Replace the whole list from a JSON body
pub async fn replace_tasks(
    store: web::Data<JsonTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    payload: web::Json<TasksPayload>,
) -> Result<HttpResponse, AppError> {
    let tasks = payload.into_inner().tasks;
    info!("Received request to replace the task list with {} tasks", tasks.len());

    for (index, task) in tasks.iter().enumerate() {
        if let Err(e) = validate_task(task) {
            info!("Rejected task list, entry {}: {}", index, e);
            return Ok(HttpResponse::BadRequest().json(ReplaceTasksResponse {
                success: false,
                html_file: None,
                message: format!("task {index}: {e}"),
            }));
        }
    }

    let tasks = web::block(move || store.replace_all(tasks)).await??;
    let key = config.chart_prefix.clone();
    let drawn = refresh_chart(&charts, tasks, key.clone()).await?;

    Ok(HttpResponse::Ok().json(ReplaceTasksResponse {
        success: true,
        html_file: drawn.then(|| format!("{key}.html")),
        message: "Task list saved".to_string(),
    }))
}

pub async fn add_task(
    store: web::Data<JsonTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    form: web::Form<TaskFields>,
) -> Result<HttpResponse, AppError> {
    let task = match validate(&form) {
        Ok(task) => task,
        Err(e) => {
            info!("Rejected new task: {}", e);
            return Ok(redirect("/"));
        }
    };
    info!("Adding task {}", task.name);

    let tasks = web::block(move || store.append(task)).await??;
    refresh_chart(&charts, tasks, config.chart_prefix.clone()).await?;
    Ok(redirect("/"))
}

pub async fn update_task(
    store: web::Data<JsonTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    form: web::Form<UpdateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(index) = parse_index(form.task_index.as_deref()) else {
        warn!("Update rejected, bad task index {:?}", form.task_index);
        return Ok(redirect("/"));
    };
    let task = match validate(&form.fields()) {
        Ok(task) => task,
        Err(e) => {
            info!("Rejected update of task {}: {}", index, e);
            return Ok(redirect("/"));
        }
    };
    info!("Updating task {} to {}", index, task.name);

    let tasks = match web::block(move || store.replace_at(index, task)).await? {
        Ok(tasks) => tasks,
        Err(e @ AppError::IndexOutOfRange { .. }) => {
            warn!("Update skipped: {}", e);
            return Ok(redirect("/"));
        }
        Err(e) => return Err(e),
    };
    refresh_chart(&charts, tasks, config.chart_prefix.clone()).await?;
    Ok(redirect("/"))
}

pub async fn delete_task(
    store: web::Data<JsonTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    form: web::Form<DeleteTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(index) = parse_index(form.task_index.as_deref()) else {
        warn!("Delete rejected, bad task index {:?}", form.task_index);
        return Ok(redirect("/"));
    };
    info!("Deleting task {}", index);

    let tasks = match web::block(move || store.remove_at(index)).await? {
        Ok(tasks) => tasks,
        Err(e @ AppError::IndexOutOfRange { .. }) => {
            warn!("Delete skipped: {}", e);
            return Ok(redirect("/"));
        }
        Err(e) => return Err(e),
    };
    refresh_chart(&charts, tasks, config.chart_prefix.clone()).await?;
    Ok(redirect("/"))
}
