use crate::{error::Result, models::post::PageQuery, state::AppState};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/group/:slug/", get(group_posts))
}

/// 群组信息流：该群组的帖子，最新在前
/// GET /group/:slug/
async fn group_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let group = state.group_service.get_by_slug(&slug).await?;
    let page = state
        .post_service
        .group_page(group.id, query.page, state.config.posts_per_page)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "group": {
                "id": group.id,
                "title": group.title,
                "slug": group.slug,
                "description": group.description
            },
            "posts": page.items,
            "pagination": page.meta()
        }
    })))
}
