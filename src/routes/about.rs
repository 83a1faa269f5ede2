use crate::state::AppState;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/about/author/", get(about_author))
        .route("/about/tech/", get(about_tech))
}

/// 关于作者的静态页
/// GET /about/author/
async fn about_author() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "title": "About the author",
            "content": "Yatube is a community blogging platform where authors share posts, join groups and follow each other."
        }
    }))
}

/// 技术栈说明的静态页
/// GET /about/tech/
async fn about_tech() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "title": "Technology",
            "content": "Built with Rust, Axum and SQLite. Sessions, feeds, groups, comments and subscriptions are served from a single binary."
        }
    }))
}
