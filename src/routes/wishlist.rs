use crate::{
    db::{users as db_users, wishlist as db_wishlist},
    error::AppError,
    models::CreateWishItemRequest,
    routes::{study_logs::UserQuery, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let items = db_wishlist::list_for_user(&state.pool, &query.user_id).await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<CreateWishItemRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    let user = db_users::find_by_id(&state.pool, &req.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    // The wishlist replaces the goal tree for elementary grades only.
    if user.is_elementary == 0 {
        return Err(AppError::BadRequest(
            "The wishlist is only available for elementary students".to_string(),
        ));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let item = db_wishlist::create_item(&state.pool, &id, &req.user_id, req.title.trim()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "item": item }))))
}

pub async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let item = db_wishlist::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    db_wishlist::set_completed(&state.pool, &id, item.completed == 0).await?;

    let item = db_wishlist::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "item": item })))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    db_wishlist::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    db_wishlist::delete_item(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
