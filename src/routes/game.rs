use crate::{
    db::{game as db_game, prefs as db_prefs, study_logs as db_logs, users as db_users},
    error::AppError,
    models::{GameSummaryResponse, SetUiPrefRequest},
    routes::AppState,
    services::archive::week_start,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// Decorates a stored summary row with today/this-week minute sums.
async fn with_minutes(
    pool: &sqlx::SqlitePool,
    data: crate::models::UserGameData,
) -> Result<GameSummaryResponse, AppError> {
    let today = Utc::now().date_naive();
    let today_key = today.format("%Y-%m-%d").to_string();
    let week_key = week_start(today).format("%Y-%m-%d").to_string();
    let today_minutes = db_logs::minutes_on_date(pool, &data.user_id, &today_key).await?;
    let week_minutes = db_logs::minutes_since(pool, &data.user_id, &week_key).await?;
    Ok(GameSummaryResponse::from_row(data, today_minutes, week_minutes))
}

/// `GET /users/:id/game` — the stored summary plus today/this-week minutes.
/// The summary is only recomputed when no row exists yet.
pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = match db_game::find_for_user(&state.pool, &user_id).await? {
        Some(data) => data,
        None => db_game::recompute_for_user(&state.pool, &user_id).await?,
    };

    let summary = with_minutes(&state.pool, data).await?;
    Ok(Json(json!({ "summary": summary })))
}

/// `POST /users/:id/game/recompute` — rebuild the summary from the raw log
/// history (repair path; keeps the stored longest streak).
pub async fn recompute_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let data = db_game::recompute_for_user(&state.pool, &user_id).await?;
    let summary = with_minutes(&state.pool, data).await?;
    Ok(Json(json!({ "summary": summary })))
}

pub async fn list_prefs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let prefs = db_prefs::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(json!({ "prefs": prefs })))
}

pub async fn set_pref(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<SetUiPrefRequest>,
) -> Result<Json<Value>, AppError> {
    if req.entity_id.trim().is_empty() {
        return Err(AppError::BadRequest("entity_id is required".to_string()));
    }
    db_prefs::set_pref(&state.pool, &user_id, &req.entity_id, req.expanded).await?;
    let prefs = db_prefs::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(json!({ "prefs": prefs })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{seed_user, test_pool};

    #[tokio::test]
    async fn recompute_reports_today_and_week_minutes() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        let today_key = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        db_logs::create_log(&pool, "l1", "u1", "math", 40, &today_key)
            .await
            .unwrap();

        let state = AppState { pool };
        let Json(body) = recompute_summary(State(state), Path("u1".to_string()))
            .await
            .unwrap();

        assert_eq!(body["summary"]["today_minutes"], 40);
        assert_eq!(body["summary"]["week_minutes"], 40);
        assert_eq!(body["summary"]["total_minutes"], 40);
    }
}
