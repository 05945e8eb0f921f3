use actix_web::web;

use super::board::board_handlers;

/// Single-user variant: one global task list.
pub fn single_user_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(board_handlers::index))
        .route("/tasks", web::get().to(board_handlers::get_tasks))
        .route("/tasks", web::post().to(board_handlers::replace_tasks))
        .route("/add_task", web::post().to(board_handlers::add_task))
        .route("/update_task", web::post().to(board_handlers::update_task))
        .route("/delete_task", web::post().to(board_handlers::delete_task));
}

use super::login::login_handlers;

pub fn login_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login_handlers::login_get))
        .route("/login", web::post().to(login_handlers::login))
        .route("/register", web::get().to(login_handlers::register_get))
        .route("/register", web::post().to(login_handlers::register))
        .route("/logout", web::get().to(login_handlers::logout));
}

use super::project_view::project_view_handlers;

/// Multi-user variant: projects and their tasks, behind a login.
pub fn multi_user_configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(login_configure)
        .route("/", web::get().to(project_view_handlers::index))
        .route("/projects/new", web::get().to(project_view_handlers::new_project_get))
        .route("/projects/new", web::post().to(project_view_handlers::new_project))
        .route("/add_task", web::post().to(project_view_handlers::add_task))
        .route("/update_task", web::post().to(project_view_handlers::update_task))
        .route("/delete_task", web::post().to(project_view_handlers::delete_task));
}
