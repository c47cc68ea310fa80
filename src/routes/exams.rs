use crate::{
    db::exams as db_exams,
    error::AppError,
    models::{CreateExamRecordRequest, ExamType},
    routes::{study_logs::UserQuery, AppState},
    services::analysis,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /exams?user_id=` — history grouped into sittings, newest first.
pub async fn list_sittings(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let records = db_exams::list_for_user(&state.pool, &query.user_id).await?;
    let sittings = analysis::group_sittings(records);
    Ok(Json(json!({ "sittings": sittings })))
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(req): Json<CreateExamRecordRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.exam_name.trim().is_empty() {
        return Err(AppError::BadRequest("Exam name is required".to_string()));
    }
    if req.subject.trim().is_empty() {
        return Err(AppError::BadRequest("Subject is required".to_string()));
    }
    req.exam_date
        .parse::<chrono::NaiveDate>()
        .map_err(|_| AppError::BadRequest("exam_date must be YYYY-MM-DD".to_string()))?;
    let max_score = req.max_score.unwrap_or(100);
    if req.score < 0 || req.score > max_score {
        return Err(AppError::BadRequest("Score must be within 0..=max_score".to_string()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let record = db_exams::create_record(
        &state.pool,
        &id,
        &req.user_id,
        req.exam_type.unwrap_or(ExamType::Mock),
        req.exam_name.trim(),
        &req.exam_date,
        req.subject.trim(),
        req.score,
        max_score,
        req.deviation_score,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "record": record }))))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    db_exams::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    db_exams::delete_record(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
