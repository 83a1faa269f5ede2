use crate::{
    error::Result,
    models::post::{CreatePostRequest, PageQuery, UpdatePostRequest},
    state::AppState,
    utils::{
        cache,
        middleware::{login_redirect, redirect_found, OptionalAuth},
    },
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
use tracing::{debug, warn};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/create/", get(create_post_form).post(create_post))
        .route("/posts/:post_id/", get(post_detail))
        .route("/posts/:post_id/edit/", get(edit_post_form).post(edit_post))
}

/// 主页信息流
/// GET /
///
/// 响应按页码做短 TTL 缓存：缓存窗口内新发布的帖子不会出现，
/// 显式清空缓存或窗口过期后才可见。其它信息流都不缓存
async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page_number = query.page.unwrap_or(1);
    let cache_key = cache::index_page_key(page_number);

    if let Ok(Some(cached)) = state.feed_cache.get(&cache_key) {
        debug!("Serving index page {} from cache", page_number);
        return Ok(Json(cached).into_response());
    }

    let page = state
        .post_service
        .index_page(query.page, state.config.posts_per_page)
        .await?;

    let payload = json!({
        "success": true,
        "data": {
            "posts": page.items,
            "pagination": page.meta()
        }
    });

    if let Err(e) = state.feed_cache.set(cache_key, payload.clone()) {
        warn!("Failed to cache index page: {}", e);
    }

    Ok(Json(payload).into_response())
}

/// 发帖表单
/// GET /create/
async fn create_post_form(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
) -> Result<Response> {
    if user.is_none() {
        return Ok(login_redirect(uri.path()));
    }

    Ok(form_descriptor(&state, None).into_response())
}

/// 创建帖子
/// POST /create/
///
/// 成功后重定向到作者的个人页
async fn create_post(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Json(request): Json<CreatePostRequest>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    state.post_service.create_post(user.id, request).await?;

    Ok(redirect_found(&format!("/profile/{}/", user.username)))
}

/// 帖子详情：帖子本身 + 分页的评论
/// GET /posts/:post_id/
async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let post = state.post_service.get_post_item(post_id).await?;
    let comments = state
        .comment_service
        .post_comments(post_id, query.page, state.config.comments_per_page)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "post": post,
            "comments": comments.items,
            "comments_pagination": comments.meta()
        }
    }))
    .into_response())
}

/// 编辑表单（预填当前内容）
/// GET /posts/:post_id/edit/
async fn edit_post_form(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(post_id): Path<i64>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    let post = state.post_service.get_post(post_id).await?;

    // 非作者静默回到详情页，不暴露归属信息
    if post.author_id != user.id {
        debug!("User {} is not the author of post {}", user.id, post_id);
        return Ok(redirect_found(&format!("/posts/{}/", post_id)));
    }

    Ok(form_descriptor(&state, Some(&post)).into_response())
}

/// 编辑帖子，仅作者可用
/// POST /posts/:post_id/edit/
///
/// 非作者的提交不落库，静默重定向到详情页
async fn edit_post(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(post_id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Response> {
    let user = match user {
        Some(user) => user,
        None => return Ok(login_redirect(uri.path())),
    };

    let post = state.post_service.get_post(post_id).await?;

    if post.author_id != user.id {
        debug!("User {} is not the author of post {}, redirecting", user.id, post_id);
        return Ok(redirect_found(&format!("/posts/{}/", post_id)));
    }

    state.post_service.update_post(post_id, request).await?;

    Ok(redirect_found(&format!("/posts/{}/", post_id)))
}

/// 发帖/编辑共用的表单描述
fn form_descriptor(state: &AppState, post: Option<&crate::models::post::Post>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "form": {
                "fields": {
                    "text": { "required": true, "max_length": state.config.max_post_length },
                    "group": { "required": false },
                    "image": { "required": false }
                },
                "instance": post
            }
        }
    }))
}
