pub mod about;
pub mod admin;
pub mod auth;
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;

use crate::{state::AppState, utils::middleware};
use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;

/// 组装完整的应用路由。
/// 路由表是扁平的，与对外的 URL 面一一对应
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(posts::router())
        .merge(comments::router())
        .merge(groups::router())
        .merge(users::router())
        .merge(follows::router())
        .merge(auth::router())
        .merge(about::router())
        .merge(admin::router())
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Yatube is running!"
}
