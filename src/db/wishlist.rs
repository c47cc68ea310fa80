use crate::error::AppError;
use crate::models::WishItem;
use sqlx::SqlitePool;

pub async fn create_item(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    title: &str,
) -> Result<WishItem, AppError> {
    sqlx::query("INSERT INTO wish_items (id, user_id, title) VALUES (?, ?, ?)")
        .bind(id)
        .bind(user_id)
        .bind(title)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created wish item".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<WishItem>, AppError> {
    let item = sqlx::query_as::<_, WishItem>(
        r#"
        SELECT id, user_id, title, completed, created_at
        FROM wish_items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<WishItem>, AppError> {
    let items = sqlx::query_as::<_, WishItem>(
        r#"
        SELECT id, user_id, title, completed, created_at
        FROM wish_items
        WHERE user_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn set_completed(pool: &SqlitePool, id: &str, completed: bool) -> Result<(), AppError> {
    sqlx::query("UPDATE wish_items SET completed = ? WHERE id = ?")
        .bind(completed as i64)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_item(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM wish_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
