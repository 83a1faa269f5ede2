use crate::{
    error::Result,
    models::{post::PageQuery, user::ProfileStats},
    state::AppState,
    utils::middleware::OptionalAuth,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/profile/:username/", get(profile))
}

/// 作者个人页：作者信息、统计、该作者的帖子
/// GET /profile/:username/
async fn profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
    OptionalAuth(viewer): OptionalAuth,
) -> Result<Json<Value>> {
    let author = state.user_service.get_by_username(&username).await?;
    debug!("Rendering profile for author {}", author.username);

    let page = state
        .post_service
        .profile_page(author.id, query.page, state.config.posts_per_page)
        .await?;

    let follow_stats = state.follow_service.stats(author.id).await?;
    let post_count = state.user_service.post_count(author.id).await?;

    // 登录用户才有关注状态，匿名访问一律 false
    let is_following = match &viewer {
        Some(viewer) => {
            state
                .follow_service
                .is_following(viewer.id, author.id)
                .await?
        }
        None => false,
    };

    let stats = ProfileStats {
        post_count,
        followers_count: follow_stats.followers_count,
        following_count: follow_stats.following_count,
        is_following,
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "author": {
                "id": author.id,
                "username": author.username,
                "first_name": author.first_name,
                "last_name": author.last_name,
                "full_name": author.full_name()
            },
            "stats": stats,
            "posts": page.items,
            "pagination": page.meta()
        }
    })))
}
