use crate::services::subjects;
use axum::Json;
use serde_json::{json, Value};

/// `GET /health` — liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// `GET /subjects` — the static display catalog.
pub async fn list_subjects() -> Json<Value> {
    let subjects: Vec<Value> = subjects::SUBJECTS
        .iter()
        .map(|(key, label)| json!({ "key": key, "label": label }))
        .collect();
    Json(json!({ "subjects": subjects }))
}
