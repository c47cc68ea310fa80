use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ReceiptReply {
    Understood,
    WillTry,
    NeedHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Normal,
    Tired,
}

/// Teacher → student message. `student_id` NULL means broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub teacher_id: String,
    pub student_id: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageReceipt {
    pub id: String,
    pub message_id: String,
    pub student_id: String,
    pub is_read: i64,
    pub reply: Option<ReceiptReply>,
    pub created_at: String,
    pub updated_at: String,
}

/// Student → teacher mood/reaction message. No receipt tracking.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentMessage {
    pub id: String,
    pub student_id: String,
    pub teacher_id: Option<String>,
    pub mood: Option<Mood>,
    pub reaction: Option<String>,
    pub body: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub teacher_id: String,
    pub student_id: Option<String>,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptRequest {
    pub student_id: String,
    pub reply: Option<ReceiptReply>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentMessageRequest {
    pub student_id: String,
    pub teacher_id: Option<String>,
    pub mood: Option<Mood>,
    pub reaction: Option<String>,
    pub body: Option<String>,
}

/// A message as seen by one student, joined with that student's receipt.
#[derive(Debug, Clone, Serialize)]
pub struct MessageForStudent {
    #[serde(flatten)]
    pub message: Message,
    pub is_read: bool,
    pub reply: Option<ReceiptReply>,
}
