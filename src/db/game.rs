use crate::db::study_logs;
use crate::error::AppError;
use crate::models::UserGameData;
use crate::services::gamification::{self, GameSnapshot};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub async fn find_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<UserGameData>, AppError> {
    let data = sqlx::query_as::<_, UserGameData>(
        r#"
        SELECT user_id, total_minutes, record_count, total_exp, current_streak,
               longest_streak, last_log_date, badges, updated_at
        FROM user_game_data
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(data)
}

fn snapshot_of(row: &UserGameData) -> GameSnapshot {
    GameSnapshot {
        total_minutes: row.total_minutes,
        record_count: row.record_count,
        total_exp: row.total_exp,
        current_streak: row.current_streak,
        longest_streak: row.longest_streak,
        last_log_date: row.last_log_date.as_deref().and_then(|d| d.parse().ok()),
        badges: serde_json::from_str(&row.badges).unwrap_or_default(),
    }
}

async fn save(pool: &SqlitePool, user_id: &str, snapshot: &GameSnapshot) -> Result<(), AppError> {
    let badges_json = serde_json::to_string(&snapshot.badges)
        .map_err(|e| AppError::Internal(format!("Failed to encode badges: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO user_game_data
            (user_id, total_minutes, record_count, total_exp, current_streak,
             longest_streak, last_log_date, badges,
             updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ON CONFLICT (user_id) DO UPDATE SET
            total_minutes = excluded.total_minutes,
            record_count = excluded.record_count,
            total_exp = excluded.total_exp,
            current_streak = excluded.current_streak,
            longest_streak = excluded.longest_streak,
            last_log_date = excluded.last_log_date,
            badges = excluded.badges,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(snapshot.total_minutes)
    .bind(snapshot.record_count)
    .bind(snapshot.total_exp)
    .bind(snapshot.current_streak)
    .bind(snapshot.longest_streak)
    .bind(snapshot.last_log_date.map(|d| d.format("%Y-%m-%d").to_string()))
    .bind(&badges_json)
    .execute(pool)
    .await?;

    Ok(())
}

/// Incremental step for one just-inserted log. Falls back to a full
/// recompute when no summary row exists yet (the log is already in the
/// store at that point, so the recompute covers it).
pub async fn apply_new_log(
    pool: &SqlitePool,
    user_id: &str,
    log_date: NaiveDate,
    minutes: i64,
) -> Result<(), AppError> {
    let snapshot = match find_for_user(pool, user_id).await? {
        Some(row) => gamification::apply_log(&snapshot_of(&row), log_date, minutes),
        None => {
            let logs = study_logs::list_for_user(pool, user_id).await?;
            gamification::recompute(&logs, Utc::now().date_naive(), 0)
        }
    };
    save(pool, user_id, &snapshot).await
}

/// Full recompute over the raw log history, keeping the stored longest
/// streak. Used for initialization and repair.
pub async fn recompute_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<UserGameData, AppError> {
    let stored_longest = find_for_user(pool, user_id)
        .await?
        .map(|row| row.longest_streak)
        .unwrap_or(0);
    let logs = study_logs::list_for_user(pool, user_id).await?;
    let snapshot = gamification::recompute(&logs, Utc::now().date_naive(), stored_longest);
    save(pool, user_id, &snapshot).await?;

    find_for_user(pool, user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve game data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{seed_user, test_pool};
    use chrono::Duration;

    #[tokio::test]
    async fn first_log_initializes_the_summary_from_history() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        let today = Utc::now().date_naive();
        let key = today.format("%Y-%m-%d").to_string();
        study_logs::create_log(&pool, "l1", "u1", "math", 40, &key)
            .await
            .unwrap();
        apply_new_log(&pool, "u1", today, 40).await.unwrap();

        let data = find_for_user(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(data.total_minutes, 40);
        assert_eq!(data.record_count, 1);
        assert_eq!(data.total_exp, 40 * 2 + 10);
        assert_eq!(data.current_streak, 1);
    }

    #[tokio::test]
    async fn consecutive_days_grow_the_streak_incrementally() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        let today = Utc::now().date_naive();
        for (i, offset) in [2i64, 1, 0].iter().enumerate() {
            let date = today - Duration::days(*offset);
            let key = date.format("%Y-%m-%d").to_string();
            let id = format!("l{i}");
            study_logs::create_log(&pool, &id, "u1", "math", 10, &key)
                .await
                .unwrap();
            apply_new_log(&pool, "u1", date, 10).await.unwrap();
        }

        let data = find_for_user(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(data.current_streak, 3);
        assert_eq!(data.longest_streak, 3);
        let badges: Vec<String> = serde_json::from_str(&data.badges).unwrap();
        assert!(badges.contains(&"streak-3".to_string()));
    }

    #[tokio::test]
    async fn recompute_matches_the_incremental_path() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        let today = Utc::now().date_naive();
        for (i, offset) in [1i64, 0].iter().enumerate() {
            let date = today - Duration::days(*offset);
            let key = date.format("%Y-%m-%d").to_string();
            let id = format!("l{i}");
            study_logs::create_log(&pool, &id, "u1", "english", 30, &key)
                .await
                .unwrap();
            apply_new_log(&pool, "u1", date, 30).await.unwrap();
        }
        let incremental = find_for_user(&pool, "u1").await.unwrap().unwrap();
        let recomputed = recompute_for_user(&pool, "u1").await.unwrap();

        assert_eq!(incremental.total_minutes, recomputed.total_minutes);
        assert_eq!(incremental.total_exp, recomputed.total_exp);
        assert_eq!(incremental.current_streak, recomputed.current_streak);
        assert_eq!(incremental.longest_streak, recomputed.longest_streak);
    }
}
