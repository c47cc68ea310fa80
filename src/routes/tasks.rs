use crate::{
    db::tasks as db_tasks,
    error::AppError,
    models::{CreateTaskRequest, TaskLevel, UpdateTaskRequest},
    routes::{study_logs::UserQuery, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let tasks = db_tasks::list_for_user(&state.pool, &query.user_id).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    // A goal is a root; every other level must sit exactly one level below
    // its named parent.
    match (&req.parent_id, req.level) {
        (None, TaskLevel::Goal) => {}
        (None, _) => {
            return Err(AppError::BadRequest(
                "Only goal tasks may be created without a parent".to_string(),
            ))
        }
        (Some(parent_id), level) => {
            let parent = db_tasks::find_by_id(&state.pool, parent_id)
                .await?
                .ok_or(AppError::NotFound)?;
            if parent.user_id != req.user_id {
                return Err(AppError::BadRequest("Parent belongs to another user".to_string()));
            }
            if parent.level.child_level() != Some(level) {
                return Err(AppError::BadRequest(
                    "Task level must be exactly one level below its parent".to_string(),
                ));
            }
        }
    }

    let id = uuid::Uuid::now_v7().to_string();
    let task = db_tasks::create_task(
        &state.pool,
        &id,
        &req.user_id,
        req.level,
        req.parent_id.as_deref(),
        req.title.trim(),
        req.start_date.as_deref(),
        req.end_date.as_deref(),
        req.memo.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Value>, AppError> {
    let task = db_tasks::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    db_tasks::update_fields(&state.pool, &task, &req).await?;

    let task = db_tasks::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "task": task })))
}

/// Flip a leaf between pending/0 and completed/100, then bring its
/// ancestors back in line.
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let task = db_tasks::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if task.level != TaskLevel::Small {
        return Err(AppError::BadRequest(
            "Only small tasks can be toggled directly".to_string(),
        ));
    }

    db_tasks::toggle_leaf(&state.pool, &task).await?;

    let task = db_tasks::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "task": task })))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let task = db_tasks::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let deleted = db_tasks::delete_cascade(&state.pool, &task).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{seed_user, test_pool};
    use crate::models::TaskLevel;

    fn request(user: &str, level: TaskLevel, parent: Option<&str>) -> CreateTaskRequest {
        CreateTaskRequest {
            user_id: user.to_string(),
            level,
            parent_id: parent.map(str::to_string),
            title: "algebra drills".to_string(),
            start_date: None,
            end_date: None,
            memo: None,
        }
    }

    async fn state_with_goal() -> AppState {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        seed_user(&pool, "u2", "ren").await;
        db_tasks::create_task(&pool, "goal", "u1", TaskLevel::Goal, None, "goal", None, None, None)
            .await
            .expect("create goal");
        AppState { pool }
    }

    #[tokio::test]
    async fn parentless_non_goal_is_rejected() {
        let state = state_with_goal().await;
        let result = create_task(State(state), Json(request("u1", TaskLevel::Large, None))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn child_two_levels_down_is_rejected() {
        let state = state_with_goal().await;
        // A small directly under a goal skips the large and medium levels.
        let result =
            create_task(State(state), Json(request("u1", TaskLevel::Small, Some("goal")))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn parent_owned_by_another_user_is_rejected() {
        let state = state_with_goal().await;
        let result =
            create_task(State(state), Json(request("u2", TaskLevel::Large, Some("goal")))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn missing_parent_is_not_found() {
        let state = state_with_goal().await;
        let result =
            create_task(State(state), Json(request("u1", TaskLevel::Large, Some("nope")))).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn valid_child_one_level_down_is_created() {
        let state = state_with_goal().await;
        let pool = state.pool.clone();
        let (status, _) =
            create_task(State(state), Json(request("u1", TaskLevel::Large, Some("goal"))))
                .await
                .expect("create large under goal");
        assert_eq!(status, StatusCode::CREATED);
        let tasks = db_tasks::list_for_user(&pool, "u1").await.unwrap();
        assert_eq!(tasks.len(), 2);
    }
}
