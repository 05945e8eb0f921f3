use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info, warn};
use sqlx::SqlitePool;

use super::project_view_models::{
    NewProjectPage, NewProjectRequest, ProjectLink, ProjectPage, ProjectQuery, ProjectTaskRequest,
};
use crate::auth::{current_user, flash_page, redirect, redirect_with_flash, take_flash, CookieKey};
use crate::chart::{ChartGenerator, CHART_TITLE};
use crate::config::Config;
use crate::error::AppError;
use crate::models::project::Project;
use crate::models::session::SessionUser;
use crate::registry;
use crate::routes::{ensure_chart, parse_index, refresh_chart, task_views, ChartView};
use crate::store::SqliteTaskStore;
use crate::templates::Templates;
use crate::validator::validate;

fn project_url(project_id: i64) -> String {
    format!("/?project_id={project_id}")
}

fn parse_project_id(raw: Option<&str>) -> Option<i64> {
    parse_index(raw).and_then(|id| i64::try_from(id).ok())
}

/// Outcome of resolving the project a mutation targets.
enum ProjectAccess {
    Granted(Project),
    Denied(HttpResponse),
}

async fn editable_project(
    pool: &SqlitePool,
    key: &CookieKey,
    user: &SessionUser,
    raw_id: Option<&str>,
) -> Result<ProjectAccess, AppError> {
    let Some(project_id) = parse_project_id(raw_id) else {
        warn!("Task change from {} without a valid project id: {:?}", user.username, raw_id);
        return Ok(ProjectAccess::Denied(redirect_with_flash(&key.0, "/", "Missing or invalid project")));
    };
    let Some(project) = registry::find_project(pool, project_id).await? else {
        warn!("Project {} not found", project_id);
        return Ok(ProjectAccess::Denied(redirect_with_flash(&key.0, "/", "Project not found")));
    };
    if !project.is_editable_by(user.user_id) {
        warn!("User {} may not edit project {}", user.username, project.id);
        return Ok(ProjectAccess::Denied(redirect_with_flash(
            &key.0,
            &project_url(project.id),
            "Only the creator of this project can change its tasks",
        )));
    }
    Ok(ProjectAccess::Granted(project))
}

/// Reloads the project's tasks and redraws its chart after a change.
async fn finish_mutation(
    store: &SqliteTaskStore,
    charts: &web::Data<ChartGenerator>,
    config: &Config,
    key: &CookieKey,
    project_id: i64,
) -> Result<HttpResponse, AppError> {
    let tasks = store.load(project_id).await?;
    let chart_key = ChartGenerator::output_key(&config.chart_prefix, Some(project_id));
    match refresh_chart(charts, tasks, chart_key).await {
        Ok(_) => Ok(redirect(&project_url(project_id))),
        Err(AppError::Render(e)) => {
            error!("Chart for project {} could not be drawn: {}", project_id, e);
            Ok(redirect_with_flash(
                &key.0,
                &project_url(project_id),
                format!("The task was saved but the chart could not be drawn: {e}"),
            ))
        }
        Err(e) => Err(e),
    }
}

// Project page: project list, tasks of the selected project and its chart
pub async fn index(
    req: HttpRequest,
    query: web::Query<ProjectQuery>,
    pool: web::Data<SqlitePool>,
    store: web::Data<SqliteTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    key: web::Data<CookieKey>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = current_user(&req, &pool, &key.0).await? else {
        return Ok(redirect("/login"));
    };

    let projects = registry::list_projects(&pool).await?;
    let requested = parse_project_id(query.project_id.as_deref());
    let project = requested
        .and_then(|id| projects.iter().find(|p| p.id == id))
        .or_else(|| projects.first())
        .cloned();
    let Some(project) = project else {
        return Err(AppError::NotFound("project".to_string()));
    };
    if requested.is_some_and(|id| id != project.id) {
        info!("Requested project {:?} not found, showing {}", requested, project.id);
    }

    let tasks = store.load(project.id).await?;
    let chart_key = ChartGenerator::output_key(&config.chart_prefix, Some(project.id));
    let has_chart = ensure_chart(&charts, &tasks, &chart_key).await?;

    let flash = take_flash(&req, &key.0);
    let page = ProjectPage {
        username: user.username.clone(),
        flash: flash.clone(),
        projects: projects
            .iter()
            .map(|p| ProjectLink {
                id: p.id,
                name: p.name.clone(),
                current: p.id == project.id,
            })
            .collect(),
        project_id: project.id,
        project_name: project.name.clone(),
        project_description: project.description.clone(),
        can_edit: project.is_editable_by(user.user_id),
        tasks: task_views(&tasks),
        chart: has_chart.then(|| ChartView::for_key(&chart_key)),
        chart_title: CHART_TITLE,
    };
    let body = templates.render("projects", &page)?;
    Ok(flash_page(body, flash.is_some()))
}

pub async fn new_project_get(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    key: web::Data<CookieKey>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    if current_user(&req, &pool, &key.0).await?.is_none() {
        return Ok(redirect("/login"));
    }
    let flash = take_flash(&req, &key.0);
    let body = templates.render("new_project", &NewProjectPage { flash: flash.clone() })?;
    Ok(flash_page(body, flash.is_some()))
}

// Handler to add a project
pub async fn new_project(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    key: web::Data<CookieKey>,
    form: web::Form<NewProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = current_user(&req, &pool, &key.0).await? else {
        return Ok(redirect("/login"));
    };
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(redirect_with_flash(&key.0, "/projects/new", "Project name is required"));
    }

    let project_id = registry::create_project(&pool, name, form.description.trim(), user.user_id).await?;
    info!("User {} created project {} ({})", user.username, project_id, name);
    Ok(redirect(&project_url(project_id)))
}

pub async fn add_task(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    store: web::Data<SqliteTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    key: web::Data<CookieKey>,
    form: web::Form<ProjectTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = current_user(&req, &pool, &key.0).await? else {
        return Ok(redirect("/login"));
    };
    let project = match editable_project(&pool, &key, &user, form.project_id.as_deref()).await? {
        ProjectAccess::Granted(project) => project,
        ProjectAccess::Denied(response) => return Ok(response),
    };

    let task = match validate(&form.fields()) {
        Ok(task) => task,
        Err(e) => {
            info!("Rejected new task in project {}: {}", project.id, e);
            return Ok(redirect_with_flash(&key.0, &project_url(project.id), format!("Please complete the task: {e}")));
        }
    };

    info!("User {} adds task {} to project {}", user.username, task.name, project.id);
    store.append(project.id, &task).await?;
    finish_mutation(&store, &charts, &config, &key, project.id).await
}

pub async fn update_task(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    store: web::Data<SqliteTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    key: web::Data<CookieKey>,
    form: web::Form<ProjectTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = current_user(&req, &pool, &key.0).await? else {
        return Ok(redirect("/login"));
    };
    let project = match editable_project(&pool, &key, &user, form.project_id.as_deref()).await? {
        ProjectAccess::Granted(project) => project,
        ProjectAccess::Denied(response) => return Ok(response),
    };

    let Some(index) = parse_index(form.task_index.as_deref()) else {
        warn!("Update rejected, bad task index {:?}", form.task_index);
        return Ok(redirect_with_flash(&key.0, &project_url(project.id), "Invalid task index"));
    };
    let task = match validate(&form.fields()) {
        Ok(task) => task,
        Err(e) => {
            info!("Rejected update of task {} in project {}: {}", index, project.id, e);
            return Ok(redirect_with_flash(&key.0, &project_url(project.id), format!("Please complete the task: {e}")));
        }
    };

    match store.replace_at(project.id, index, &task).await {
        Ok(()) => {}
        Err(e @ AppError::IndexOutOfRange { .. }) => {
            warn!("Update in project {} skipped: {}", project.id, e);
            return Ok(redirect_with_flash(&key.0, &project_url(project.id), "Task not found"));
        }
        Err(e) => return Err(e),
    }
    finish_mutation(&store, &charts, &config, &key, project.id).await
}

pub async fn delete_task(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    store: web::Data<SqliteTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    key: web::Data<CookieKey>,
    form: web::Form<ProjectTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = current_user(&req, &pool, &key.0).await? else {
        return Ok(redirect("/login"));
    };
    let project = match editable_project(&pool, &key, &user, form.project_id.as_deref()).await? {
        ProjectAccess::Granted(project) => project,
        ProjectAccess::Denied(response) => return Ok(response),
    };

    let Some(index) = parse_index(form.task_index.as_deref()) else {
        warn!("Delete rejected, bad task index {:?}", form.task_index);
        return Ok(redirect_with_flash(&key.0, &project_url(project.id), "Invalid task index"));
    };

    match store.remove_at(project.id, index).await {
        Ok(()) => {}
        Err(e @ AppError::IndexOutOfRange { .. }) => {
            warn!("Delete in project {} skipped: {}", project.id, e);
            return Ok(redirect_with_flash(&key.0, &project_url(project.id), "Task not found"));
        }
        Err(e) => return Err(e),
    }
    finish_mutation(&store, &charts, &config, &key, project.id).await
}
