use crate::error::AppError;
use crate::models::{
    Message, MessageForStudent, MessageReceipt, ReceiptReply, StudentMessage,
};
use crate::models::Mood;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn create_message(
    pool: &SqlitePool,
    id: &str,
    teacher_id: &str,
    student_id: Option<&str>,
    title: &str,
    body: &str,
) -> Result<Message, AppError> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, teacher_id, student_id, title, body)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(teacher_id)
    .bind(student_id)
    .bind(title)
    .bind(body)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created message".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Message>, AppError> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, teacher_id, student_id, title, body, created_at
        FROM messages
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

/// Direct and broadcast messages visible to one student, newest first,
/// joined with that student's receipt where one exists.
pub async fn list_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<MessageForStudent>, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: String,
        teacher_id: String,
        student_id: Option<String>,
        title: String,
        body: String,
        created_at: String,
        is_read: Option<i64>,
        reply: Option<ReceiptReply>,
    }

    let rows = sqlx::query_as::<_, Row>(
        r#"
        SELECT m.id, m.teacher_id, m.student_id, m.title, m.body, m.created_at,
               r.is_read, r.reply
        FROM messages m
        LEFT JOIN message_receipts r ON r.message_id = m.id AND r.student_id = ?
        WHERE m.student_id = ? OR m.student_id IS NULL
        ORDER BY m.created_at DESC
        "#,
    )
    .bind(student_id)
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MessageForStudent {
            message: Message {
                id: row.id,
                teacher_id: row.teacher_id,
                student_id: row.student_id,
                title: row.title,
                body: row.body,
                created_at: row.created_at,
            },
            is_read: row.is_read.unwrap_or(0) != 0,
            reply: row.reply,
        })
        .collect())
}

pub async fn list_receipts(
    pool: &SqlitePool,
    message_id: &str,
) -> Result<Vec<MessageReceipt>, AppError> {
    let receipts = sqlx::query_as::<_, MessageReceipt>(
        r#"
        SELECT id, message_id, student_id, is_read, reply, created_at, updated_at
        FROM message_receipts
        WHERE message_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(message_id)
    .fetch_all(pool)
    .await?;

    Ok(receipts)
}

/// Marks a message read for one student, recording the reply if given.
/// Creates the receipt on first touch, updates it afterwards.
pub async fn upsert_receipt(
    pool: &SqlitePool,
    message_id: &str,
    student_id: &str,
    reply: Option<ReceiptReply>,
) -> Result<MessageReceipt, AppError> {
    sqlx::query(
        r#"
        INSERT INTO message_receipts (id, message_id, student_id, is_read, reply)
        VALUES (?, ?, ?, 1, ?)
        ON CONFLICT (message_id, student_id) DO UPDATE SET
            is_read = 1,
            reply = COALESCE(excluded.reply, reply),
            updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
        "#,
    )
    .bind(Uuid::now_v7().to_string())
    .bind(message_id)
    .bind(student_id)
    .bind(reply)
    .execute(pool)
    .await?;

    let receipt = sqlx::query_as::<_, MessageReceipt>(
        r#"
        SELECT id, message_id, student_id, is_read, reply, created_at, updated_at
        FROM message_receipts
        WHERE message_id = ? AND student_id = ?
        "#,
    )
    .bind(message_id)
    .bind(student_id)
    .fetch_one(pool)
    .await?;

    Ok(receipt)
}

pub async fn create_student_message(
    pool: &SqlitePool,
    id: &str,
    student_id: &str,
    teacher_id: Option<&str>,
    mood: Option<Mood>,
    reaction: Option<&str>,
    body: Option<&str>,
) -> Result<StudentMessage, AppError> {
    sqlx::query(
        r#"
        INSERT INTO student_messages (id, student_id, teacher_id, mood, reaction, body)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(student_id)
    .bind(teacher_id)
    .bind(mood)
    .bind(reaction)
    .bind(body)
    .execute(pool)
    .await?;

    let message = sqlx::query_as::<_, StudentMessage>(
        r#"
        SELECT id, student_id, teacher_id, mood, reaction, body, created_at
        FROM student_messages
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// Student messages visible to a teacher: addressed to them or to no one
/// in particular.
pub async fn list_student_messages(
    pool: &SqlitePool,
    teacher_id: &str,
) -> Result<Vec<StudentMessage>, AppError> {
    let messages = sqlx::query_as::<_, StudentMessage>(
        r#"
        SELECT id, student_id, teacher_id, mood, reaction, body, created_at
        FROM student_messages
        WHERE teacher_id = ? OR teacher_id IS NULL
        ORDER BY created_at DESC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
