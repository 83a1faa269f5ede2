use crate::{
    error::Result,
    models::post::PageQuery,
    state::AppState,
    utils::middleware::{login_redirect, redirect_found, OptionalAuth},
};
use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/follow/", get(follow_index))
        .route("/profile/:username/follow/", get(profile_follow).post(profile_follow))
        .route("/profile/:username/unfollow/", get(profile_unfollow).post(profile_unfollow))
}

/// 关注信息流：所关注作者的全部帖子。
/// 每次请求都基于当前关注边重新计算，不走缓存
/// GET /follow/
async fn follow_index(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    let page = state
        .post_service
        .feed_page(user.id, query.page, state.config.posts_per_page)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "posts": page.items,
            "pagination": page.meta()
        }
    }))
    .into_response())
}

/// 关注作者。无论是否发生状态变化，都重定向到作者个人页
/// GET|POST /profile/:username/follow/
async fn profile_follow(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(username): Path<String>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    let author = state.user_service.get_by_username(&username).await?;

    debug!("User {} following author {}", user.id, author.id);
    state.follow_service.follow(user.id, author.id).await?;

    Ok(redirect_found(&format!("/profile/{}/", username)))
}

/// 取消关注。不存在的关注边返回404
/// GET|POST /profile/:username/unfollow/
async fn profile_unfollow(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(username): Path<String>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    let author = state.user_service.get_by_username(&username).await?;

    debug!("User {} unfollowing author {}", user.id, author.id);
    state.follow_service.unfollow(user.id, author.id).await?;

    Ok(redirect_found(&format!("/profile/{}/", username)))
}
