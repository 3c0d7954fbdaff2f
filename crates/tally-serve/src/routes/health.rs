use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
