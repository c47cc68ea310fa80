//! HTTP route handlers, one module per resource.

pub mod archive;
pub mod auth;
pub mod exams;
pub mod game;
pub mod health;
pub mod messages;
pub mod study_logs;
pub mod targets;
pub mod tasks;
pub mod wishlist;

use sqlx::SqlitePool;

/// Shared state injected into every handler via `State(AppState)`.
/// `SqlitePool` is internally reference-counted, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}
