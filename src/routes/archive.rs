use crate::{
    db::archives as db_archives,
    error::AppError,
    models::StudyLogArchiveResponse,
    routes::{study_logs::UserQuery, AppState},
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

/// `POST /archive/weekly` — compact logs older than one week.
pub async fn run_weekly(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let report = db_archives::run_weekly_archive(&state.pool).await?;
    Ok(Json(json!({ "report": report })))
}

/// `GET /archive/weekly?user_id=` — archives for a user, newest week first.
pub async fn list_archives(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let archives: Vec<StudyLogArchiveResponse> =
        db_archives::list_for_user(&state.pool, &query.user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(json!({ "archives": archives })))
}
