use crate::{
    error::{AppError, Result},
    models::user::{LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, SignupRequest},
    state::AppState,
    utils::middleware::redirect_found,
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// 登录成功后应返回的原始页面路径
    pub next: Option<String>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup/", get(signup_form).post(signup))
        .route("/auth/login/", get(login_form).post(login))
        .route("/auth/logout/", post(logout))
        .route("/auth/password-reset/", post(password_reset))
        .route("/auth/password-reset/confirm/", post(password_reset_confirm))
}

/// 注册表单
/// GET /auth/signup/
async fn signup_form(State(state): State<Arc<AppState>>) -> Result<Response> {
    Ok(Json(json!({
        "success": true,
        "data": {
            "form": {
                "fields": {
                    "first_name": { "required": false },
                    "last_name": { "required": false },
                    "username": { "required": true, "min_length": 3, "max_length": 30 },
                    "email": { "required": true },
                    "password1": { "required": true, "min_length": 8 },
                    "password2": { "required": true }
                },
                "registrations_enabled": state.config.enable_registrations
            }
        }
    }))
    .into_response())
}

/// 注册新用户，成功后重定向到主页
/// POST /auth/signup/
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<Response> {
    if !state.config.enable_registrations {
        return Err(AppError::forbidden("Registrations are disabled"));
    }

    state.auth_service.signup(request).await?;

    Ok(redirect_found("/"))
}

/// 登录表单
/// GET /auth/login/
async fn login_form(Query(query): Query<LoginQuery>) -> Result<Response> {
    Ok(Json(json!({
        "success": true,
        "data": {
            "form": {
                "fields": {
                    "username": { "required": true },
                    "password": { "required": true }
                },
                "next": query.next
            }
        }
    }))
    .into_response())
}

/// 登录：校验凭据并发放会话令牌。
/// 请求带 next 参数时原样带回，客户端据此回到最初请求的页面
/// POST /auth/login/
async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let (user, token) = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": user,
            "next": query.next.unwrap_or_else(|| "/".to_string())
        }
    }))
    .into_response())
}

/// 注销当前会话，重定向到主页
/// POST /auth/logout/
async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = bearer_token(&headers) {
        state.auth_service.logout(token).await?;
        debug!("Session terminated");
    }

    Ok(redirect_found("/"))
}

/// 发起密码重置。无论邮箱是否存在都返回成功
/// POST /auth/password-reset/
async fn password_reset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<Response> {
    state.auth_service.request_password_reset(&request.email).await?;

    Ok(Json(json!({
        "success": true,
        "message": "If the email address is registered, a reset token has been issued"
    }))
    .into_response())
}

/// 用重置令牌设置新密码
/// POST /auth/password-reset/confirm/
async fn password_reset_confirm(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PasswordResetConfirmRequest>,
) -> Result<Response> {
    state.auth_service.confirm_password_reset(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password has been reset"
    }))
    .into_response())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}
