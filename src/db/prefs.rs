use crate::error::AppError;
use crate::models::UiPref;
use sqlx::SqlitePool;

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<UiPref>, AppError> {
    let prefs = sqlx::query_as::<_, UiPref>(
        r#"
        SELECT user_id, entity_id, expanded, updated_at
        FROM ui_prefs
        WHERE user_id = ?
        ORDER BY entity_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(prefs)
}

pub async fn set_pref(
    pool: &SqlitePool,
    user_id: &str,
    entity_id: &str,
    expanded: bool,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO ui_prefs (user_id, entity_id, expanded)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, entity_id) DO UPDATE SET
            expanded = excluded.expanded,
            updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
        "#,
    )
    .bind(user_id)
    .bind(entity_id)
    .bind(expanded as i64)
    .execute(pool)
    .await?;

    Ok(())
}
