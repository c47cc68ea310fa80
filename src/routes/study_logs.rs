use crate::{
    db::{game as db_game, study_logs as db_logs, users as db_users},
    error::AppError,
    models::CreateStudyLogRequest,
    routes::AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let logs = db_logs::list_for_user(&state.pool, &query.user_id).await?;
    Ok(Json(json!({ "logs": logs })))
}

pub async fn create_log(
    State(state): State<AppState>,
    Json(req): Json<CreateStudyLogRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.subject.trim().is_empty() {
        return Err(AppError::BadRequest("Subject is required".to_string()));
    }
    if req.duration_minutes < 0 {
        return Err(AppError::BadRequest("Duration must not be negative".to_string()));
    }
    let log_date: NaiveDate = req
        .log_date
        .parse()
        .map_err(|_| AppError::BadRequest("log_date must be YYYY-MM-DD".to_string()))?;
    if db_users::find_by_id(&state.pool, &req.user_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let id = uuid::Uuid::now_v7().to_string();
    let log = db_logs::create_log(
        &state.pool,
        &id,
        &req.user_id,
        req.subject.trim(),
        req.duration_minutes,
        &req.log_date,
    )
    .await?;

    // Keep the gamification summary in step with the new log.
    db_game::apply_new_log(&state.pool, &req.user_id, log_date, req.duration_minutes).await?;

    Ok((StatusCode::CREATED, Json(json!({ "log": log }))))
}
