use crate::error::AppError;
use crate::models::TargetSchool;
use sqlx::SqlitePool;

pub async fn create_target(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    school_name: &str,
    target_total_score: i64,
    subject_targets_json: &str,
    priority: i64,
) -> Result<TargetSchool, AppError> {
    sqlx::query(
        r#"
        INSERT INTO target_schools
            (id, user_id, school_name, target_total_score, subject_targets, priority)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(school_name)
    .bind(target_total_score)
    .bind(subject_targets_json)
    .bind(priority)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created target".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<TargetSchool>, AppError> {
    let target = sqlx::query_as::<_, TargetSchool>(
        r#"
        SELECT id, user_id, school_name, target_total_score, subject_targets, priority, created_at
        FROM target_schools
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(target)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<TargetSchool>, AppError> {
    let targets = sqlx::query_as::<_, TargetSchool>(
        r#"
        SELECT id, user_id, school_name, target_total_score, subject_targets, priority, created_at
        FROM target_schools
        WHERE user_id = ?
        ORDER BY priority, created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(targets)
}

pub async fn delete_target(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM target_schools WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
