//! Page endpoints served once the gate lets a request through.
//!
//! Page rendering lives elsewhere; these only identify which page was reached.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entry))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/{*page}", get(dashboard_page))
        .route("/profile/{user_id}", get(profile))
}

async fn entry() -> Json<Value> {
    Json(json!({ "page": "entry" }))
}

async fn dashboard() -> Json<Value> {
    Json(json!({ "page": "dashboard" }))
}

async fn dashboard_page(Path(page): Path<String>) -> Json<Value> {
    Json(json!({ "page": "dashboard", "section": page }))
}

async fn profile(Path(user_id): Path<String>) -> Json<Value> {
    Json(json!({ "page": "profile", "user_id": user_id }))
}
