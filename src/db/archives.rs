use crate::db::study_logs;
use crate::error::AppError;
use crate::models::{ArchiveRunReport, StudyLogArchive};
use crate::services::archive::{bucket_old_logs, WeekBucket};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use uuid::Uuid;

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<StudyLogArchive>, AppError> {
    let archives = sqlx::query_as::<_, StudyLogArchive>(
        r#"
        SELECT id, user_id, week_start, subjects, total_duration, log_count, created_at
        FROM study_log_archives
        WHERE user_id = ?
        ORDER BY week_start DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(archives)
}

pub async fn find_for_week(
    pool: &SqlitePool,
    user_id: &str,
    week_start: &str,
) -> Result<Option<StudyLogArchive>, AppError> {
    let archive = sqlx::query_as::<_, StudyLogArchive>(
        r#"
        SELECT id, user_id, week_start, subjects, total_duration, log_count, created_at
        FROM study_log_archives
        WHERE user_id = ? AND week_start = ?
        "#,
    )
    .bind(user_id)
    .bind(week_start)
    .fetch_optional(pool)
    .await?;

    Ok(archive)
}

/// Compacts all logs dated more than seven days ago into one archive per
/// (user, week). A week that already has an archive is merged into, never
/// skipped: the job must not delete logs it has not preserved. Each
/// bucket's write + delete runs in its own transaction.
pub async fn run_weekly_archive(pool: &SqlitePool) -> Result<ArchiveRunReport, AppError> {
    let cutoff = Utc::now().date_naive() - Duration::days(7);
    let logs = study_logs::list_all(pool).await?;
    let buckets = bucket_old_logs(&logs, cutoff);

    let mut report = ArchiveRunReport::default();
    for bucket in buckets {
        let merged = apply_bucket(pool, &bucket).await?;
        if merged {
            report.archives_merged += 1;
        } else {
            report.archives_created += 1;
        }
        report.logs_deleted += bucket.log_ids.len() as u64;
    }

    tracing::info!(
        created = report.archives_created,
        merged = report.archives_merged,
        deleted = report.logs_deleted,
        "weekly archive run finished"
    );
    Ok(report)
}

/// Inserts or merges one bucket and deletes its source logs atomically.
/// Returns true when an existing archive was merged into.
async fn apply_bucket(pool: &SqlitePool, bucket: &WeekBucket) -> Result<bool, AppError> {
    let week_key = bucket.week_start.format("%Y-%m-%d").to_string();
    let existing = find_for_week(pool, &bucket.user_id, &week_key).await?;

    let mut tx = pool.begin().await?;
    let merged = match existing {
        Some(archive) => {
            let mut subjects: BTreeMap<String, i64> =
                serde_json::from_str(&archive.subjects).unwrap_or_default();
            for (subject, minutes) in &bucket.subjects {
                *subjects.entry(subject.clone()).or_insert(0) += minutes;
            }
            let subjects_json = serde_json::to_string(&subjects)
                .map_err(|e| AppError::Internal(format!("Failed to encode subjects: {e}")))?;

            sqlx::query(
                r#"
                UPDATE study_log_archives
                SET subjects = ?, total_duration = total_duration + ?, log_count = log_count + ?
                WHERE id = ?
                "#,
            )
            .bind(&subjects_json)
            .bind(bucket.total_duration)
            .bind(bucket.log_count)
            .bind(&archive.id)
            .execute(&mut *tx)
            .await?;
            true
        }
        None => {
            let subjects_json = serde_json::to_string(&bucket.subjects)
                .map_err(|e| AppError::Internal(format!("Failed to encode subjects: {e}")))?;

            sqlx::query(
                r#"
                INSERT INTO study_log_archives
                    (id, user_id, week_start, subjects, total_duration, log_count)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::now_v7().to_string())
            .bind(&bucket.user_id)
            .bind(&week_key)
            .bind(&subjects_json)
            .bind(bucket.total_duration)
            .bind(bucket.log_count)
            .execute(&mut *tx)
            .await?;
            false
        }
    };

    for log_id in &bucket.log_ids {
        sqlx::query("DELETE FROM study_logs WHERE id = ?")
            .bind(log_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(merged)
}
