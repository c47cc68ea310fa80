use crate::{
    db::{exams as db_exams, targets as db_targets},
    error::AppError,
    models::{CreateTargetSchoolRequest, TargetSchoolResponse},
    routes::{study_logs::UserQuery, AppState},
    services::analysis,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const WEAKNESS_SUMMARY_LIMIT: usize = 3;

pub async fn list_targets(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let targets: Vec<TargetSchoolResponse> =
        db_targets::list_for_user(&state.pool, &query.user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(json!({ "targets": targets })))
}

pub async fn create_target(
    State(state): State<AppState>,
    Json(req): Json<CreateTargetSchoolRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.school_name.trim().is_empty() {
        return Err(AppError::BadRequest("School name is required".to_string()));
    }

    let subject_targets = req.subject_targets.unwrap_or_default();
    let subject_targets_json = serde_json::to_string(&subject_targets)
        .map_err(|e| AppError::Internal(format!("Failed to encode targets: {e}")))?;

    let id = uuid::Uuid::now_v7().to_string();
    let target = db_targets::create_target(
        &state.pool,
        &id,
        &req.user_id,
        req.school_name.trim(),
        req.target_total_score.unwrap_or(0),
        &subject_targets_json,
        req.priority.unwrap_or(1),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "target": TargetSchoolResponse::from(target) })),
    ))
}

pub async fn delete_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    db_targets::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    db_targets::delete_target(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /targets/:id/analysis` — per-subject gaps between the target and
/// the owner's latest exam scores, weakest first.
pub async fn target_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let target = db_targets::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let exams = db_exams::list_for_user(&state.pool, &target.user_id).await?;

    let gaps = analysis::subject_gaps(&target.subject_targets(), &exams);
    let weaknesses = analysis::weaknesses(&gaps, WEAKNESS_SUMMARY_LIMIT);
    let achieved = gaps.iter().filter(|g| g.achieved).count();

    Ok(Json(json!({
        "target": TargetSchoolResponse::from(target),
        "gaps": gaps,
        "weaknesses": weaknesses,
        "achieved_subjects": achieved,
    })))
}
