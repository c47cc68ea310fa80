use crate::error::AppError;
use crate::models::{ExamRecord, ExamType};
use sqlx::SqlitePool;

#[allow(clippy::too_many_arguments)]
pub async fn create_record(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    exam_type: ExamType,
    exam_name: &str,
    exam_date: &str,
    subject: &str,
    score: i64,
    max_score: i64,
    deviation_score: Option<f64>,
) -> Result<ExamRecord, AppError> {
    sqlx::query(
        r#"
        INSERT INTO exam_records
            (id, user_id, exam_type, exam_name, exam_date, subject, score, max_score, deviation_score)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(exam_type)
    .bind(exam_name)
    .bind(exam_date)
    .bind(subject)
    .bind(score)
    .bind(max_score)
    .bind(deviation_score)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created exam record".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<ExamRecord>, AppError> {
    let record = sqlx::query_as::<_, ExamRecord>(
        r#"
        SELECT id, user_id, exam_type, exam_name, exam_date, subject,
               score, max_score, deviation_score, created_at
        FROM exam_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// History newest-first. The secondary created_at order makes same-day
/// ties resolve to the most recently inserted record, which the gap
/// analysis relies on.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<ExamRecord>, AppError> {
    let records = sqlx::query_as::<_, ExamRecord>(
        r#"
        SELECT id, user_id, exam_type, exam_name, exam_date, subject,
               score, max_score, deviation_score, created_at
        FROM exam_records
        WHERE user_id = ?
        ORDER BY exam_date DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

pub async fn delete_record(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM exam_records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
