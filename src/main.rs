use std::io;

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use gantt_board::auth::CookieKey;
use gantt_board::chart::{ChartGenerator, PlottersRenderer};
use gantt_board::config::{Config, Variant};
use gantt_board::routes::routes;
use gantt_board::store::{db, JsonTaskStore, SqliteTaskStore};
use gantt_board::templates::Templates;

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let renderer = PlottersRenderer::new(config.image_scale).map_err(startup_error)?;
    let charts = web::Data::new(ChartGenerator::new(&config.static_dir, Box::new(renderer)));
    let templates = web::Data::new(Templates::new().map_err(startup_error)?);
    std::fs::create_dir_all(&config.static_dir)?;

    let server_address = config.bind_address.clone();
    let static_dir = config.static_dir.clone();

    match config.variant {
        Variant::SingleUser => {
            let store = JsonTaskStore::new(&config.tasks_file);
            // draw the chart once so the first page load has one
            let tasks = store.load().map_err(startup_error)?;
            if let Err(e) = charts.refresh(&tasks, &config.chart_prefix) {
                error!("Initial chart could not be drawn: {}", e);
            }

            let store = web::Data::new(store);
            let config = web::Data::new(config);
            info!("Single-user board running at http://{}", server_address);

            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .app_data(store.clone())
                    .app_data(charts.clone())
                    .app_data(config.clone())
                    .app_data(templates.clone())
                    .service(Files::new("/static", &static_dir))
                    .configure(routes::single_user_configure)
            })
            .bind(&server_address)?
            .run()
            .await
        }
        Variant::MultiUser => {
            let pool = db::connect(&config.database_url)
                .await
                .map_err(startup_error)?;
            db::init_db(&pool).await.map_err(startup_error)?;

            let key = web::Data::new(CookieKey(config.cookie_key()));
            let store = web::Data::new(SqliteTaskStore::new(pool.clone()));
            let pool = web::Data::new(pool);
            let config = web::Data::new(config);
            info!("Multi-user board running at http://{}", server_address);

            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .app_data(pool.clone())
                    .app_data(store.clone())
                    .app_data(charts.clone())
                    .app_data(config.clone())
                    .app_data(key.clone())
                    .app_data(templates.clone())
                    .service(Files::new("/static", &static_dir))
                    .configure(routes::multi_user_configure)
            })
            .bind(&server_address)?
            .run()
            .await
        }
    }
}
