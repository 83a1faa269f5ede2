use crate::{
    error::{AppError, Result},
    models::group::{CreateGroupRequest, UpdateGroupRequest},
    models::user::User,
    state::AppState,
    utils::middleware::{login_redirect, OptionalAuth},
};
use axum::{
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/groups/", get(list_groups).post(create_group))
        .route(
            "/admin/groups/:group_id/",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/admin/cache/clear/", post(clear_cache))
}

/// 管理接口只对 staff 开放；匿名访问与其它受保护页面一样重定向到登录页
fn require_staff(user: Option<User>, uri: &Uri) -> std::result::Result<User, Response> {
    let user = match user {
        Some(user) => user,
        None => return Err(login_redirect(uri.path())),
    };

    if !user.is_staff {
        return Err(AppError::forbidden("Staff access required").into_response());
    }

    Ok(user)
}

/// 群组列表
/// GET /admin/groups/
async fn list_groups(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
) -> Result<Response> {
    let _user = match require_staff(user, &uri) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let groups = state.group_service.list().await?;

    Ok(Json(json!({
        "success": true,
        "data": groups
    }))
    .into_response())
}

/// 创建群组
/// POST /admin/groups/
async fn create_group(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Json(request): Json<CreateGroupRequest>,
) -> Result<Response> {
    let user = match require_staff(user, &uri) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let group = state.group_service.create_group(request).await?;
    info!("Staff {} created group {}", user.username, group.slug);

    Ok(Json(json!({
        "success": true,
        "data": group
    }))
    .into_response())
}

/// 查看单个群组
/// GET /admin/groups/:group_id/
async fn get_group(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(group_id): Path<i64>,
) -> Result<Response> {
    let _user = match require_staff(user, &uri) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let group = state.group_service.get_by_id(group_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": group
    }))
    .into_response())
}

/// 更新群组
/// PUT /admin/groups/:group_id/
async fn update_group(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(group_id): Path<i64>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Response> {
    let _user = match require_staff(user, &uri) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let group = state.group_service.update_group(group_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "data": group
    }))
    .into_response())
}

/// 删除群组（帖子保留，群组引用置空）
/// DELETE /admin/groups/:group_id/
async fn delete_group(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
    Path(group_id): Path<i64>,
) -> Result<Response> {
    let _user = match require_staff(user, &uri) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    state.group_service.delete_group(group_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Group deleted"
    }))
    .into_response())
}

/// 显式清空主页信息流缓存。
/// 这是缓存唯一的主动失效入口，发帖本身不触发失效
/// POST /admin/cache/clear/
async fn clear_cache(
    State(state): State<Arc<AppState>>,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
) -> Result<Response> {
    let user = match require_staff(user, &uri) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    state
        .feed_cache
        .clear()
        .map_err(|e| AppError::Internal(format!("Failed to clear cache: {}", e)))?;
    info!("Staff {} cleared the feed cache", user.username);

    Ok(Json(json!({
        "success": true,
        "message": "Cache cleared"
    }))
    .into_response())
}
