mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::NaiveDate;
use gantt_board::chart::{ChartGenerator, ChartRenderer};
use gantt_board::config::Config;
use gantt_board::models::task::{default_tasks, Task};
use gantt_board::routes::routes;
use gantt_board::store::JsonTaskStore;
use gantt_board::templates::Templates;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use common::{body_text, location, FailingRenderer, RecordingRenderer};

struct Board {
    _dir: TempDir,
    store: web::Data<JsonTaskStore>,
    charts: web::Data<ChartGenerator>,
    config: web::Data<Config>,
    templates: web::Data<Templates>,
    renderer: RecordingRenderer,
}

impl Board {
    fn new() -> Self {
        let renderer = RecordingRenderer::default();
        Self::with_renderer(renderer.clone(), Box::new(renderer))
    }

    fn with_renderer(renderer: RecordingRenderer, engine: Box<dyn ChartRenderer>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        let config = Config {
            static_dir: static_dir.clone(),
            tasks_file: static_dir.join("tasks.json"),
            ..Config::default()
        };
        Board {
            store: web::Data::new(JsonTaskStore::new(&config.tasks_file)),
            charts: web::Data::new(ChartGenerator::new(&static_dir, engine)),
            config: web::Data::new(config),
            templates: web::Data::new(Templates::new().unwrap()),
            renderer,
            _dir: dir,
        }
    }

    fn tasks(&self) -> Vec<Task> {
        self.store.load().unwrap()
    }
}

macro_rules! board_app {
    ($board:expr) => {
        test::init_service(
            App::new()
                .app_data($board.store.clone())
                .app_data($board.charts.clone())
                .app_data($board.config.clone())
                .app_data($board.templates.clone())
                .configure(routes::single_user_configure),
        )
        .await
    };
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task_form(name: &str, start: &str, finish: &str) -> Vec<(&'static str, String)> {
    vec![
        ("task_name", name.to_string()),
        ("start_date", start.to_string()),
        ("finish_date", finish.to_string()),
    ]
}

#[actix_web::test]
async fn index_seeds_defaults_and_draws_chart() {
    let board = Board::new();
    let app = board_app!(board);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;

    assert!(body.contains("Data Preparation"));
    assert!(body.contains("/static/gantt_chart.png"));
    assert_eq!(board.tasks(), default_tasks());
    assert!(board.charts.exists("gantt_chart"));
    assert_eq!(board.renderer.renders(), 1);
    assert_eq!(board.renderer.last().rows.len(), 5);
}

#[actix_web::test]
async fn view_redraws_a_chart_older_than_the_task_file() {
    let board = Board::new();
    let app = board_app!(board);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(board.renderer.last().rows.len(), 5);

    // saved without a redraw, as after a failed render
    board
        .store
        .append(Task::new("Review", date(2025, 7, 1), date(2025, 7, 15)))
        .unwrap();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(board.tasks().len(), 6);
    let spec = board.renderer.last();
    assert_eq!(spec.rows.len(), 6);
    assert_eq!(spec.rows[5].label, "Review");
}

#[actix_web::test]
async fn out_of_range_year_is_rejected_before_saving() {
    let board = Board::new();
    let app = board_app!(board);
    board.tasks();

    let req = test::TestRequest::post()
        .uri("/add_task")
        .set_form(task_form("Far", "+262142-12-31", "+262142-12-31"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(board.tasks(), default_tasks());
}

#[actix_web::test]
async fn add_task_appends_and_adds_a_bar_group() {
    let board = Board::new();
    let app = board_app!(board);
    let before = board.tasks();

    let req = test::TestRequest::post()
        .uri("/add_task")
        .set_form(task_form("Review", "2025-07-01", "2025-07-15"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let tasks = board.tasks();
    assert_eq!(tasks.len(), 6);
    assert_eq!(&tasks[..5], &before[..]);
    assert_eq!(tasks[5], Task::new("Review", date(2025, 7, 1), date(2025, 7, 15)));
    assert_eq!(tasks[5].resource, "Review");

    let spec = board.renderer.last();
    assert_eq!(spec.rows.len(), before.len() + 1);
    assert_eq!(spec.rows[5].label, "Review");
}

#[actix_web::test]
async fn incomplete_task_is_ignored() {
    let board = Board::new();
    let app = board_app!(board);
    board.tasks();

    let req = test::TestRequest::post()
        .uri("/add_task")
        .set_form(task_form("", "2024-01-01", "2024-02-01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(board.tasks(), default_tasks());
    assert_eq!(board.renderer.renders(), 0);
}

#[actix_web::test]
async fn finish_before_start_is_rejected_without_crashing() {
    let board = Board::new();
    let app = board_app!(board);
    let before = board.tasks();

    let mut form = task_form("Reporting", "2025-05-01", "2025-04-01");
    form.push(("task_index", "0".to_string()));
    let req = test::TestRequest::post().uri("/update_task").set_form(form).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(board.tasks(), before);
}

#[actix_web::test]
async fn update_changes_only_the_addressed_task() {
    let board = Board::new();
    let app = board_app!(board);
    let before = board.tasks();

    let mut form = task_form("Kickoff", "2023-12-01", "2023-12-15");
    form.push(("task_index", "1".to_string()));
    let req = test::TestRequest::post().uri("/update_task").set_form(form).to_request();
    test::call_service(&app, req).await;

    let mut expected = before;
    expected[1] = Task::new("Kickoff", date(2023, 12, 1), date(2023, 12, 15));
    assert_eq!(board.tasks(), expected);
}

#[actix_web::test]
async fn stale_index_after_delete_hits_the_next_task() {
    let board = Board::new();
    let app = board_app!(board);
    let before = board.tasks();

    let req = test::TestRequest::post()
        .uri("/delete_task")
        .set_form([("task_index", "2")])
        .to_request();
    test::call_service(&app, req).await;
    let tasks = board.tasks();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[2], before[3]);

    // the form still says index 2, which is now the former index 3
    let mut form = task_form("Baseline v2", "2024-05-01", "2024-11-30");
    form.push(("task_index", "2".to_string()));
    let req = test::TestRequest::post().uri("/update_task").set_form(form).to_request();
    test::call_service(&app, req).await;

    let tasks = board.tasks();
    assert_eq!(tasks[2].name, "Baseline v2");
    assert!(tasks.iter().all(|t| t.name != "Baseline Models"));
    assert_eq!(tasks[3], before[4]);
}

#[actix_web::test]
async fn out_of_range_and_malformed_indices_are_no_ops() {
    let board = Board::new();
    let app = board_app!(board);
    board.tasks();

    for index in ["9", "-1", "two", ""] {
        let req = test::TestRequest::post()
            .uri("/delete_task")
            .set_form([("task_index", index)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "index {index:?}");
    }
    assert_eq!(board.tasks(), default_tasks());
}

#[actix_web::test]
async fn tasks_endpoint_reads_and_replaces_the_list() {
    let board = Board::new();
    let app = board_app!(board);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/tasks").to_request()).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 5);
    assert_eq!(body["tasks"][0]["Task"], "Reporting");

    let replacement = vec![Task::new("Only", date(2024, 1, 1), date(2024, 1, 31))];
    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(serde_json::json!({ "tasks": replacement }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["html_file"], "gantt_chart.html");
    assert_eq!(board.tasks(), replacement);
}

#[actix_web::test]
async fn tasks_endpoint_rejects_inverted_dates() {
    let board = Board::new();
    let app = board_app!(board);
    board.tasks();

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(serde_json::json!({ "tasks": [
            { "Task": "Bad", "Start": "2024-02-01", "Finish": "2024-01-01", "Resource": "Bad" }
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(board.tasks(), default_tasks());
}

#[actix_web::test]
async fn emptying_the_list_removes_the_chart() {
    let board = Board::new();
    let app = board_app!(board);
    test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(board.charts.exists("gantt_chart"));

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(serde_json::json!({ "tasks": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["html_file"].is_null());
    assert!(!board.charts.exists("gantt_chart"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("No tasks yet."));
}

#[actix_web::test]
async fn render_failure_fails_the_request_with_a_message() {
    let board = Board::with_renderer(RecordingRenderer::default(), Box::new(FailingRenderer));
    let app = board_app!(board);

    let req = test::TestRequest::post()
        .uri("/add_task")
        .set_form(task_form("Review", "2025-07-01", "2025-07-15"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(resp).await.contains("engine unavailable"));
    // the task itself was stored before drawing
    assert_eq!(board.tasks().len(), 6);
}
