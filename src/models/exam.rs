use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ExamType {
    Mock,
    Regular,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExamRecord {
    pub id: String,
    pub user_id: String,
    pub exam_type: ExamType,
    pub exam_name: String,
    /// `YYYY-MM-DD`.
    pub exam_date: String,
    pub subject: String,
    pub score: i64,
    pub max_score: i64,
    pub deviation_score: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateExamRecordRequest {
    pub user_id: String,
    pub exam_type: Option<ExamType>,
    pub exam_name: String,
    pub exam_date: String,
    pub subject: String,
    pub score: i64,
    pub max_score: Option<i64>,
    pub deviation_score: Option<f64>,
}

/// Records sharing (exam_name, exam_date) displayed as one sitting.
#[derive(Debug, Clone, Serialize)]
pub struct ExamSitting {
    pub exam_name: String,
    pub exam_date: String,
    pub exam_type: ExamType,
    pub total_score: i64,
    pub total_max_score: i64,
    pub records: Vec<ExamRecord>,
}
