use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyLog {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub duration_minutes: i64,
    /// Calendar date of the session, `YYYY-MM-DD`.
    pub log_date: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudyLogRequest {
    pub user_id: String,
    pub subject: String,
    pub duration_minutes: i64,
    pub log_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyLogArchive {
    pub id: String,
    pub user_id: String,
    /// Monday of the archived ISO week, `YYYY-MM-DD`.
    pub week_start: String,
    /// JSON map subject → minutes, stored as TEXT.
    pub subjects: String,
    pub total_duration: i64,
    pub log_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyLogArchiveResponse {
    pub id: String,
    pub user_id: String,
    pub week_start: String,
    pub subjects: BTreeMap<String, i64>,
    pub total_duration: i64,
    pub log_count: i64,
    pub created_at: String,
}

impl From<StudyLogArchive> for StudyLogArchiveResponse {
    fn from(archive: StudyLogArchive) -> Self {
        Self {
            subjects: serde_json::from_str(&archive.subjects).unwrap_or_default(),
            id: archive.id,
            user_id: archive.user_id,
            week_start: archive.week_start,
            total_duration: archive.total_duration,
            log_count: archive.log_count,
            created_at: archive.created_at,
        }
    }
}

/// Result counts of one archival run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ArchiveRunReport {
    pub archives_created: u64,
    pub archives_merged: u64,
    pub logs_deleted: u64,
}
