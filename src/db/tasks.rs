use crate::error::AppError;
use crate::models::{Task, TaskLevel, TaskStatus, UpdateTaskRequest};
use crate::services::hierarchy::{self, ProgressUpdate};
use sqlx::SqlitePool;

#[allow(clippy::too_many_arguments)]
pub async fn create_task(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    level: TaskLevel,
    parent_id: Option<&str>,
    title: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    memo: Option<&str>,
) -> Result<Task, AppError> {
    sqlx::query(
        r#"
        INSERT INTO tasks (id, user_id, level, parent_id, title, start_date, end_date, memo)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(level)
    .bind(parent_id)
    .bind(title)
    .bind(start_date)
    .bind(end_date)
    .bind(memo)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created task".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, user_id, level, parent_id, title, start_date, end_date,
               status, progress, memo, created_at
        FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, user_id, level, parent_id, title, start_date, end_date,
               status, progress, memo, created_at
        FROM tasks
        WHERE user_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn update_fields(
    pool: &SqlitePool,
    task: &Task,
    req: &UpdateTaskRequest,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE tasks SET title = ?, start_date = ?, end_date = ?, memo = ?
        WHERE id = ?
        "#,
    )
    .bind(req.title.as_deref().unwrap_or(&task.title))
    .bind(req.start_date.as_deref().or(task.start_date.as_deref()))
    .bind(req.end_date.as_deref().or(task.end_date.as_deref()))
    .bind(req.memo.as_deref().or(task.memo.as_deref()))
    .bind(&task.id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Sets a leaf's completion state and recomputes its ancestors, applying
/// the leaf write and every ancestor update in one transaction.
pub async fn toggle_leaf(pool: &SqlitePool, task: &Task) -> Result<(), AppError> {
    let (status, progress) = match task.status {
        TaskStatus::Pending => (TaskStatus::Completed, 100),
        TaskStatus::Completed => (TaskStatus::Pending, 0),
    };

    // Snapshot with the leaf's new value already in place, so the
    // recompute sees the tree as it is about to be written.
    let mut snapshot = list_for_user(pool, &task.user_id).await?;
    if let Some(node) = snapshot.iter_mut().find(|t| t.id == task.id) {
        node.status = status;
        node.progress = progress;
    }
    let updates = hierarchy::recompute_ancestors(&snapshot, task.parent_id.as_deref());

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE tasks SET status = ?, progress = ? WHERE id = ?")
        .bind(status)
        .bind(progress)
        .bind(&task.id)
        .execute(&mut *tx)
        .await?;
    apply_updates(&mut tx, &updates).await?;
    tx.commit().await?;

    Ok(())
}

/// Deletes a node and its whole subtree, then recomputes the ancestors of
/// the original parent over the remaining tasks. One transaction covers
/// the deletes and the ancestor writes.
pub async fn delete_cascade(pool: &SqlitePool, task: &Task) -> Result<u64, AppError> {
    let snapshot = list_for_user(pool, &task.user_id).await?;
    let descendants = hierarchy::descendant_ids(&snapshot, &task.id);
    let mut doomed = descendants.clone();
    doomed.push(task.id.clone());

    let remaining: Vec<Task> = snapshot
        .into_iter()
        .filter(|t| !doomed.contains(&t.id))
        .collect();
    let updates = hierarchy::recompute_ancestors(&remaining, task.parent_id.as_deref());

    // Children before parents, the node itself last: descendant_ids lists
    // every parent before its children, so the reverse order respects the
    // self-referencing foreign key.
    let mut tx = pool.begin().await?;
    for id in descendants.iter().rev().chain(std::iter::once(&task.id)) {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    apply_updates(&mut tx, &updates).await?;
    tx.commit().await?;

    Ok(doomed.len() as u64)
}

async fn apply_updates(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    updates: &[ProgressUpdate],
) -> Result<(), AppError> {
    for update in updates {
        sqlx::query("UPDATE tasks SET status = ?, progress = ? WHERE id = ?")
            .bind(update.status)
            .bind(update.progress)
            .bind(&update.task_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::{seed_user, test_pool};

    async fn add(
        pool: &SqlitePool,
        id: &str,
        level: TaskLevel,
        parent: Option<&str>,
    ) -> Task {
        create_task(pool, id, "u1", level, parent, id, None, None, None)
            .await
            .expect("create task")
    }

    #[tokio::test]
    async fn toggling_leaves_propagates_to_every_ancestor() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        add(&pool, "goal", TaskLevel::Goal, None).await;
        add(&pool, "large", TaskLevel::Large, Some("goal")).await;
        let s1 = add(&pool, "s1", TaskLevel::Small, Some("large")).await;
        let s2 = add(&pool, "s2", TaskLevel::Small, Some("large")).await;

        // The small tasks hang directly off the large here; the mean is
        // level-agnostic, so the shape matches the two-children example.
        toggle_leaf(&pool, &s1).await.unwrap();
        let large = find_by_id(&pool, "large").await.unwrap().unwrap();
        assert_eq!(large.progress, 50);
        assert_eq!(large.status, TaskStatus::Pending);
        let goal = find_by_id(&pool, "goal").await.unwrap().unwrap();
        assert_eq!(goal.progress, 50);

        toggle_leaf(&pool, &s2).await.unwrap();
        let large = find_by_id(&pool, "large").await.unwrap().unwrap();
        assert_eq!(large.progress, 100);
        assert_eq!(large.status, TaskStatus::Completed);
        let goal = find_by_id(&pool, "goal").await.unwrap().unwrap();
        assert_eq!(goal.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn toggling_back_reverts_ancestors_to_pending() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        add(&pool, "goal", TaskLevel::Goal, None).await;
        add(&pool, "large", TaskLevel::Large, Some("goal")).await;
        let s1 = add(&pool, "s1", TaskLevel::Small, Some("large")).await;

        toggle_leaf(&pool, &s1).await.unwrap();
        let s1 = find_by_id(&pool, "s1").await.unwrap().unwrap();
        assert_eq!(s1.status, TaskStatus::Completed);

        toggle_leaf(&pool, &s1).await.unwrap();
        let s1 = find_by_id(&pool, "s1").await.unwrap().unwrap();
        assert_eq!(s1.progress, 0);
        let large = find_by_id(&pool, "large").await.unwrap().unwrap();
        assert_eq!(large.progress, 0);
        assert_eq!(large.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn delete_removes_subtree_and_recomputes_remaining_parent() {
        let pool = test_pool().await;
        seed_user(&pool, "u1", "aki").await;
        add(&pool, "goal", TaskLevel::Goal, None).await;
        let large = add(&pool, "large", TaskLevel::Large, Some("goal")).await;
        add(&pool, "medium", TaskLevel::Medium, Some("large")).await;
        add(&pool, "s1", TaskLevel::Small, Some("medium")).await;
        add(&pool, "s2", TaskLevel::Small, Some("medium")).await;
        // A sibling branch that is already complete.
        add(&pool, "large2", TaskLevel::Large, Some("goal")).await;
        let s3 = add(&pool, "s3", TaskLevel::Small, Some("large2")).await;
        toggle_leaf(&pool, &s3).await.unwrap();

        let goal = find_by_id(&pool, "goal").await.unwrap().unwrap();
        assert_eq!(goal.progress, 50); // (0 + 100) / 2

        let deleted = delete_cascade(&pool, &large).await.unwrap();
        assert_eq!(deleted, 4); // large + medium + two smalls

        for id in ["large", "medium", "s1", "s2"] {
            assert!(find_by_id(&pool, id).await.unwrap().is_none(), "{id} survived");
        }
        // The goal now averages over its one remaining child.
        let goal = find_by_id(&pool, "goal").await.unwrap().unwrap();
        assert_eq!(goal.progress, 100);
        assert_eq!(goal.status, TaskStatus::Completed);
    }
}
