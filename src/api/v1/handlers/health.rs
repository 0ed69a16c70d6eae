/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証なしで通ることの確認にも使う
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
