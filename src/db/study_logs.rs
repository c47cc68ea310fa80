use crate::error::AppError;
use crate::models::StudyLog;
use sqlx::SqlitePool;

pub async fn create_log(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    subject: &str,
    duration_minutes: i64,
    log_date: &str,
) -> Result<StudyLog, AppError> {
    sqlx::query(
        r#"
        INSERT INTO study_logs (id, user_id, subject, duration_minutes, log_date)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(subject)
    .bind(duration_minutes)
    .bind(log_date)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created log".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<StudyLog>, AppError> {
    let log = sqlx::query_as::<_, StudyLog>(
        r#"
        SELECT id, user_id, subject, duration_minutes, log_date, created_at
        FROM study_logs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(log)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<StudyLog>, AppError> {
    let logs = sqlx::query_as::<_, StudyLog>(
        r#"
        SELECT id, user_id, subject, duration_minutes, log_date, created_at
        FROM study_logs
        WHERE user_id = ?
        ORDER BY log_date DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// Every log in the store, for the archival scan.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<StudyLog>, AppError> {
    let logs = sqlx::query_as::<_, StudyLog>(
        r#"
        SELECT id, user_id, subject, duration_minutes, log_date, created_at
        FROM study_logs
        ORDER BY user_id, log_date
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// Sum of minutes logged by `user_id` on exactly `date`.
pub async fn minutes_on_date(
    pool: &SqlitePool,
    user_id: &str,
    date: &str,
) -> Result<i64, AppError> {
    let (minutes,): (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(duration_minutes), 0)
        FROM study_logs
        WHERE user_id = ? AND log_date = ?
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(minutes)
}

/// Sum of minutes logged by `user_id` on or after `since` (inclusive).
pub async fn minutes_since(
    pool: &SqlitePool,
    user_id: &str,
    since: &str,
) -> Result<i64, AppError> {
    let (minutes,): (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(duration_minutes), 0)
        FROM study_logs
        WHERE user_id = ? AND log_date >= ?
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(minutes)
}
