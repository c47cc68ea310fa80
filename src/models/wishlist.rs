use serde::{Deserialize, Serialize};

/// Flat checklist item — the elementary-grade substitute for the task tree.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WishItem {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub completed: i64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWishItemRequest {
    pub user_id: String,
    pub title: String,
}
