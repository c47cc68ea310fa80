//! Study-progress tracker server: bootstraps config, logging, the SQLite
//! pool and migrations, then serves the API under /api/v1.

mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use config::Config;
use routes::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studytrack=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting studytrack server on {}:{}", config.host, config.port);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState { pool };

    let auth_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/password", post(routes::auth::change_password));

    let api_routes = Router::new()
        .merge(auth_routes)
        // Study logs (append-only) and weekly archives
        .route(
            "/logs",
            get(routes::study_logs::list_logs).post(routes::study_logs::create_log),
        )
        .route(
            "/archive/weekly",
            get(routes::archive::list_archives).post(routes::archive::run_weekly),
        )
        // Task tree
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/tasks/{id}/toggle", patch(routes::tasks::toggle_task))
        // Exams and target schools
        .route(
            "/exams",
            get(routes::exams::list_sittings).post(routes::exams::create_record),
        )
        .route("/exams/{id}", delete(routes::exams::delete_record))
        .route(
            "/targets",
            get(routes::targets::list_targets).post(routes::targets::create_target),
        )
        .route("/targets/{id}", delete(routes::targets::delete_target))
        .route("/targets/{id}/analysis", get(routes::targets::target_analysis))
        // Messaging
        .route(
            "/messages",
            get(routes::messages::list_for_student).post(routes::messages::create_message),
        )
        .route("/messages/{id}/receipts", get(routes::messages::list_receipts))
        .route("/messages/{id}/receipt", post(routes::messages::touch_receipt))
        .route(
            "/student-messages",
            get(routes::messages::list_student_messages)
                .post(routes::messages::create_student_message),
        )
        // Elementary wishlist
        .route(
            "/wishlist",
            get(routes::wishlist::list_items).post(routes::wishlist::create_item),
        )
        .route("/wishlist/{id}", delete(routes::wishlist::delete_item))
        .route("/wishlist/{id}/toggle", patch(routes::wishlist::toggle_item))
        // Gamification summary and UI prefs
        .route("/users/{id}/game", get(routes::game::get_summary))
        .route("/users/{id}/game/recompute", post(routes::game::recompute_summary))
        .route(
            "/users/{id}/prefs",
            get(routes::game::list_prefs).put(routes::game::set_pref),
        )
        .route("/subjects", get(routes::health::list_subjects))
        .route("/health", get(routes::health::health_check))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
