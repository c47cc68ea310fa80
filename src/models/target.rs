use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TargetSchool {
    pub id: String,
    pub user_id: String,
    pub school_name: String,
    pub target_total_score: i64,
    /// JSON map subject → target score, stored as TEXT.
    pub subject_targets: String,
    pub priority: i64,
    pub created_at: String,
}

impl TargetSchool {
    pub fn subject_targets(&self) -> BTreeMap<String, i64> {
        serde_json::from_str(&self.subject_targets).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSchoolResponse {
    pub id: String,
    pub user_id: String,
    pub school_name: String,
    pub target_total_score: i64,
    pub subject_targets: BTreeMap<String, i64>,
    pub priority: i64,
    pub created_at: String,
}

impl From<TargetSchool> for TargetSchoolResponse {
    fn from(target: TargetSchool) -> Self {
        Self {
            subject_targets: target.subject_targets(),
            id: target.id,
            user_id: target.user_id,
            school_name: target.school_name,
            target_total_score: target.target_total_score,
            priority: target.priority,
            created_at: target.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTargetSchoolRequest {
    pub user_id: String,
    pub school_name: String,
    pub target_total_score: Option<i64>,
    pub subject_targets: Option<BTreeMap<String, i64>>,
    pub priority: Option<i64>,
}
