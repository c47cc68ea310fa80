use crate::{
    db::{messages as db_messages, users as db_users},
    error::AppError,
    models::{CreateMessageRequest, CreateStudentMessageRequest, ReceiptRequest, Role},
    routes::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TeacherQuery {
    pub teacher_id: String,
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.title.trim().is_empty() || req.body.trim().is_empty() {
        return Err(AppError::BadRequest("Title and body are required".to_string()));
    }
    let sender = db_users::find_by_id(&state.pool, &req.teacher_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if sender.role != Role::Teacher {
        return Err(AppError::BadRequest("Only teachers can send messages".to_string()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let message = db_messages::create_message(
        &state.pool,
        &id,
        &req.teacher_id,
        req.student_id.as_deref(),
        req.title.trim(),
        req.body.trim(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

/// `GET /messages?student_id=` — direct and broadcast messages with the
/// student's read/reply state.
pub async fn list_for_student(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<Value>, AppError> {
    let messages = db_messages::list_for_student(&state.pool, &query.student_id).await?;
    Ok(Json(json!({ "messages": messages })))
}

pub async fn list_receipts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db_messages::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let receipts = db_messages::list_receipts(&state.pool, &id).await?;
    Ok(Json(json!({ "receipts": receipts })))
}

/// `POST /messages/:id/receipt` — mark read and optionally record one of
/// the fixed replies.
pub async fn touch_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReceiptRequest>,
) -> Result<Json<Value>, AppError> {
    db_messages::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let receipt = db_messages::upsert_receipt(&state.pool, &id, &req.student_id, req.reply).await?;
    Ok(Json(json!({ "receipt": receipt })))
}

pub async fn create_student_message(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentMessageRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.mood.is_none() && req.reaction.is_none() && req.body.is_none() {
        return Err(AppError::BadRequest(
            "A mood, reaction, or body is required".to_string(),
        ));
    }
    db_users::find_by_id(&state.pool, &req.student_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let id = uuid::Uuid::now_v7().to_string();
    let message = db_messages::create_student_message(
        &state.pool,
        &id,
        &req.student_id,
        req.teacher_id.as_deref(),
        req.mood,
        req.reaction.as_deref(),
        req.body.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

pub async fn list_student_messages(
    State(state): State<AppState>,
    Query(query): Query<TeacherQuery>,
) -> Result<Json<Value>, AppError> {
    let messages = db_messages::list_student_messages(&state.pool, &query.teacher_id).await?;
    Ok(Json(json!({ "messages": messages })))
}
