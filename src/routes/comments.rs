use crate::{
    error::Result,
    models::comment::CreateCommentRequest,
    state::AppState,
    utils::middleware::{login_redirect, redirect_found, OptionalAuth},
};
use axum::{
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/posts/:post_id/comment/",
        get(comment_form).post(add_comment),
    )
}

/// 评论表单
/// GET /posts/:post_id/comment/
async fn comment_form(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(post_id): Path<i64>,
) -> Result<Response> {
    if user.is_none() {
        return Ok(login_redirect(uri.path()));
    }

    // 帖子不存在时直接404，而不是渲染表单
    state.post_service.get_post(post_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "form": {
                "fields": {
                    "text": { "required": true, "max_length": state.config.max_comment_length }
                }
            }
        }
    }))
    .into_response())
}

/// 给帖子添加评论，成功后重定向回详情页
/// POST /posts/:post_id/comment/
async fn add_comment(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(post_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    state
        .comment_service
        .add_comment(post_id, user.id, request)
        .await?;

    Ok(redirect_found(&format!("/posts/{}/", post_id)))
}
