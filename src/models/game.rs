use serde::{Deserialize, Serialize};

/// Denormalized gamification summary, one row per user.
/// Updated incrementally as logs are inserted; fully recomputable for repair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserGameData {
    pub user_id: String,
    pub total_minutes: i64,
    pub record_count: i64,
    pub total_exp: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_log_date: Option<String>,
    /// JSON array of earned badge ids, stored as TEXT.
    pub badges: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSummaryResponse {
    pub user_id: String,
    pub total_minutes: i64,
    pub record_count: i64,
    pub total_exp: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_log_date: Option<String>,
    pub badges: Vec<String>,
    pub today_minutes: i64,
    pub week_minutes: i64,
}

impl GameSummaryResponse {
    pub fn from_row(data: UserGameData, today_minutes: i64, week_minutes: i64) -> Self {
        Self {
            badges: serde_json::from_str(&data.badges).unwrap_or_default(),
            user_id: data.user_id,
            total_minutes: data.total_minutes,
            record_count: data.record_count,
            total_exp: data.total_exp,
            current_streak: data.current_streak,
            longest_streak: data.longest_streak,
            last_log_date: data.last_log_date,
            today_minutes,
            week_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UiPref {
    pub user_id: String,
    pub entity_id: String,
    pub expanded: i64,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct SetUiPrefRequest {
    pub entity_id: String,
    pub expanded: bool,
}
